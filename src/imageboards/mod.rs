//! All internal logic for searching posts on the imageboard and downloading them.
//!
//! The [`FetchQueue`](queue::FetchQueue) only talks to the network through the two traits
//! declared here, [`PostSource`] and [`ImageFetcher`].
use async_trait::async_trait;
use bytes::Bytes;

use self::{error::SourceError, gelbooru::query::SearchRequest, post::error::PostError};
use crate::Post;

pub mod dedup;
pub mod error;
pub mod fetcher;
pub mod gelbooru;
pub mod macros;
pub mod post;
pub mod queue;
pub mod rating;

pub const USER_AGENT: &str = concat!("Downbooru/", env!("CARGO_PKG_VERSION"));

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// How many entries the imageboard sent back, including the ones that could not become a
    /// [`Post`]. Pagination is decided on this number, not on `posts.len()`.
    pub returned: usize,
    pub posts: Vec<Post>,
}

impl Page {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            returned: posts.len(),
            posts,
        }
    }

    #[inline]
    pub fn skipped(&self) -> usize {
        self.returned.saturating_sub(self.posts.len())
    }
}

/// Something that can answer a [`SearchRequest`] with one page of posts.
#[async_trait(?Send)]
pub trait PostSource {
    /// Performs exactly one request. A search with no results is `Ok` with an empty page.
    async fn fetch_page(&self, request: &SearchRequest) -> Result<Page, SourceError>;
}

/// Something that can retrieve the raw bytes behind a post's `file_url`.
#[async_trait(?Send)]
pub trait ImageFetcher {
    async fn fetch_image(&self, file_url: &str) -> Result<Bytes, PostError>;
}
