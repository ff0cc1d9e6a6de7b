use std::io;

use thiserror::Error;

/// Everything that can go wrong while fetching, decoding or saving a single post.
///
/// None of these abort a run: the queue records them as an `ERROR` entry in the manifest.
#[derive(Error, Debug)]
pub enum PostError {
    #[error("Failed to access file: {source}")]
    FileIOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to connect to download URL: {source}")]
    ConnectionFail {
        #[from]
        source: reqwest::Error,
    },

    #[error("Image source returned status {status}")]
    RemoteStatus { status: u16 },

    #[error("Remote file is {size} bytes, more than the {limit} bytes allowed")]
    TooLarge { size: u64, limit: u64 },

    #[error("Error while fetching chunk: {message}")]
    ChunkDownloadFail { message: String },

    #[error("Downloaded file is not a decodable image: {source}")]
    Decode {
        #[from]
        source: image::ImageError,
    },
}
