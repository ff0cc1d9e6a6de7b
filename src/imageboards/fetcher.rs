//! Streaming image download over HTTP.
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use bytesize::ByteSize;
use futures::StreamExt;
use log::debug;
use reqwest::Client;

use super::{post::error::PostError, ImageFetcher};

/// Largest file accepted, whether announced by `Content-Length` or counted while streaming.
pub const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Upper bound for the buffer reserved up front from `Content-Length`.
const MAX_PREALLOC: u64 = 32 * 1024 * 1024;

pub struct HttpImageFetcher {
    client: Client,
    max_size: u64,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_size: MAX_FILE_SIZE,
        }
    }

    /// Changes the largest file size accepted.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    fn too_large(&self, size: u64) -> PostError {
        PostError::TooLarge {
            size,
            limit: self.max_size,
        }
    }
}

#[async_trait(?Send)]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch_image(&self, file_url: &str) -> Result<Bytes, PostError> {
        debug!("Fetching {}", file_url);
        let res = self.client.get(file_url).send().await?;

        if !res.status().is_success() {
            return Err(PostError::RemoteStatus {
                status: res.status().as_u16(),
            });
        }

        let size = res.content_length().unwrap_or_default();
        debug!("Remote file is {}", ByteSize::b(size).to_string_as(true));

        if size > self.max_size {
            return Err(self.too_large(size));
        }

        let mut buf = BytesMut::with_capacity(size.min(MAX_PREALLOC) as usize);

        // Download the file chunk by chunk.
        debug!("Retrieving chunks...");
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = item.map_err(|e| PostError::ChunkDownloadFail {
                message: e.to_string(),
            })?;

            let received = (buf.len() + chunk.len()) as u64;
            if received > self.max_size {
                return Err(self.too_large(received));
            }
            buf.extend_from_slice(&chunk);
        }

        Ok(buf.freeze())
    }
}
