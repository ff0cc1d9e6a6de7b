use thiserror::Error;

/// Failures while asking the imageboard for a page of posts.
///
/// An empty result set is *not* an error: it is an empty page.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    #[error("Imageboard returned status {status}")]
    BadStatus { status: u16 },

    #[error("Error while deserializing JSON: {0}")]
    JsonDecode(#[from] serde_json::Error),

    #[error("Imageboard returned an invalid response")]
    InvalidServerResponse,
}
