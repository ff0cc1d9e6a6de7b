//! Search request construction for the Gelbooru `dapi` post index.
//!
//! The wire form of the tag list is `rating:<name>+tag1+tag2...`, where each user tag is
//! lower-cased and has its internal whitespace mapped to underscores.
use log::debug;
use urlencoding::encode;

use crate::{config::ApiCredentials, join_tags, Rating};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Already normalized tags, in the order they were given.
    pub tags: Vec<String>,
    pub rating: Rating,
    pub page_size: Option<u16>,
    pub page_index: Option<u32>,
    pub post_id: Option<u64>,
}

/// Lower-cases a tag and joins its words with `_`.
///
/// ```
/// use downbooru::imageboards::gelbooru::query::normalize_tag;
///
/// assert_eq!(normalize_tag("Deep Rock Galactic"), "deep_rock_galactic");
/// ```
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

impl SearchRequest {
    pub fn new<S: AsRef<str>>(tags: &[S], rating: Rating) -> Self {
        Self {
            tags: tags
                .iter()
                .map(|t| normalize_tag(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
            rating,
            page_size: None,
            page_index: None,
            post_id: None,
        }
    }

    #[must_use]
    pub fn page_size(mut self, size: u16) -> Self {
        self.page_size = Some(size);
        self
    }

    #[must_use]
    pub fn page(mut self, index: u32) -> Self {
        self.page_index = Some(index);
        self
    }

    /// Narrows the request to a single post. Pagination is ignored once this is set.
    #[must_use]
    pub fn post_id(mut self, id: u64) -> Self {
        self.post_id = Some(id);
        self
    }

    /// Renders the `tags` parameter value, or `None` when there are no tags to search.
    pub fn tag_string(&self) -> Option<String> {
        self.render_tags(|t| t.to_string())
    }

    /// Same as [`tag_string`](Self::tag_string), with every tag percent-encoded so it can go
    /// straight into a query string. The `+` separators stay literal.
    pub fn encoded_tag_string(&self) -> Option<String> {
        self.render_tags(|t| encode(t).into_owned())
    }

    fn render_tags(&self, render: impl Fn(&str) -> String) -> Option<String> {
        if self.tags.is_empty() {
            return None;
        }

        let mut terms = Vec::with_capacity(self.tags.len() + 1);
        terms.push(format!("rating:{}", self.rating.as_str()));
        terms.extend(self.tags.iter().map(|t| render(t)));

        Some(join_tags!(terms))
    }

    /// Builds the full request URL on top of `base`, which must already carry its own query string.
    pub fn to_url(&self, base: &str, credentials: Option<&ApiCredentials>) -> String {
        let mut url = String::from(base);

        if self.post_id.is_none() {
            if let Some(limit) = self.page_size {
                url.push_str(&format!("&limit={}", limit));
            }
            if let Some(page) = self.page_index {
                url.push_str(&format!("&pid={}", page));
            }
        }

        if let Some(tags) = self.encoded_tag_string() {
            url.push_str(&format!("&tags={}", tags));
        }

        if let Some(id) = self.post_id {
            url.push_str(&format!("&id={}", id));
        }

        url.push_str("&json=1");

        if let Some(creds) = credentials {
            url.push_str(&format!(
                "&api_key={}&user_id={}",
                encode(&creds.api_key),
                encode(&creds.user_id)
            ));
        }

        debug!("Query URL: {}", url);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://gelbooru.com/index.php?page=dapi&s=post&q=index";

    #[test]
    fn multi_word_tags_are_normalized() {
        let req = SearchRequest::new(&["Deep Rock Galactic"], Rating::from_level(2));
        assert_eq!(
            req.tag_string().as_deref(),
            Some("rating:sensitive+deep_rock_galactic")
        );
    }

    #[test]
    fn tags_keep_order_and_join_with_plus() {
        let req = SearchRequest::new(&["Blue Sky", "cloud", "-furry"], Rating::General);
        assert_eq!(
            req.tag_string().as_deref(),
            Some("rating:general+blue_sky+cloud+-furry")
        );
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalize_tag("  Long   Hair "), "long_hair");
        assert_eq!(normalize_tag("   "), "");
    }

    #[test]
    fn unset_pagination_is_not_serialized() {
        let url = SearchRequest::new(&["cat"], Rating::Explicit).to_url(BASE, None);
        assert_eq!(url, format!("{BASE}&tags=rating:explicit+cat&json=1"));
        assert!(!url.contains("limit="));
        assert!(!url.contains("pid="));
    }

    #[test]
    fn pagination_is_serialized_when_set() {
        let url = SearchRequest::new(&["cat"], Rating::Questionable)
            .page_size(1000)
            .page(3)
            .to_url(BASE, None);
        assert_eq!(
            url,
            format!("{BASE}&limit=1000&pid=3&tags=rating:questionable+cat&json=1")
        );
    }

    #[test]
    fn post_id_overrides_pagination() {
        let url = SearchRequest::new::<&str>(&[], Rating::General)
            .page_size(1000)
            .page(2)
            .post_id(9001)
            .to_url(BASE, None);
        assert_eq!(url, format!("{BASE}&id=9001&json=1"));
    }

    #[test]
    fn reserved_characters_in_tags_are_encoded() {
        let req = SearchRequest::new(&["rock&roll", "c++", "100%", "#1"], Rating::General);
        assert_eq!(
            req.tag_string().as_deref(),
            Some("rating:general+rock&roll+c+++100%+#1")
        );

        let url = req.to_url(BASE, None);
        assert_eq!(
            url,
            format!("{BASE}&tags=rating:general+rock%26roll+c%2B%2B+100%25+%231&json=1")
        );
    }

    #[test]
    fn credentials_are_appended() {
        let creds = ApiCredentials {
            api_key: "key".into(),
            user_id: "123".into(),
        };
        let url = SearchRequest::new(&["cat"], Rating::General).to_url(BASE, Some(&creds));
        assert!(url.ends_with("&json=1&api_key=key&user_id=123"));
    }
}
