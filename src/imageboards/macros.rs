#[macro_export]
macro_rules! client {
    ($timeout:expr) => {{
        reqwest::Client::builder()
            .user_agent($crate::imageboards::USER_AGENT)
            .timeout($timeout)
            .build()
    }};
}

#[macro_export]
macro_rules! join_tags {
    ($x:expr) => {{
        let tl = $x.join("+");
        tl
    }};
}

/// Takes the text after the last dot of the last path segment of an URL.
#[macro_export]
macro_rules! extract_ext_from_url {
    ($x:expr) => {{
        let segment = $x.rsplit('/').next().unwrap_or_default();
        let ext = segment.rsplit('.').next().unwrap_or_default();
        ext.to_string()
    }};
}
