use std::io;

use thiserror::Error;

use crate::imageboards::error::SourceError;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to create destination directory {path}. error: {source}")]
    DirCreationError { path: String, source: io::Error },

    #[error("Failed to serialize manifest: {source}")]
    ManifestSerializeFail {
        #[from]
        source: serde_json::Error,
    },

    #[error("Manifest file {file} is corrupted: {source}")]
    ManifestDecodeError {
        file: String,
        source: serde_json::Error,
    },

    #[error("Failed to fetch page {page} of rating {rating}: {source}")]
    PageFetchError {
        rating: String,
        page: u32,
        source: SourceError,
    },
}
