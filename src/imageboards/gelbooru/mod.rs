//! Post source for `https://gelbooru.com`
//!
//! Talks to the `dapi` post index with `json=1` and maps every entry that carries a `file_url`
//! into a [`Post`](crate::Post).
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use tokio::time::Instant;

use crate::{
    config::{ApiConfig, ApiCredentials},
    imageboards::{error::SourceError, Page, PostSource},
};

use self::{models::GelbooruTopLevel, query::SearchRequest};

pub mod models;
pub mod query;

pub struct GelbooruSource {
    client: Client,
    api_url: String,
    credentials: Option<ApiCredentials>,
}

impl GelbooruSource {
    pub fn new(client: Client, config: &ApiConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            credentials: config.credentials(),
        }
    }

    /// Lower level mapping of a raw response body, kept separate so it can be fed JSON obtained
    /// through other means.
    pub fn map_posts(raw_json: &str) -> Result<Page, SourceError> {
        let start = Instant::now();
        let value = serde_json::from_str::<Value>(raw_json)?;

        if !value.is_object() {
            return Err(SourceError::InvalidServerResponse);
        }

        let top = serde_json::from_value::<GelbooruTopLevel>(value)?;

        let Some(list) = top.post else {
            debug!("Response has no post list, treating page as empty");
            return Ok(Page::default());
        };

        let returned = list.len();
        let posts = list
            .into_iter()
            .filter_map(|p| {
                let id = p.id;
                let post = p.into_post();
                if post.is_none() {
                    debug!("Post {} has no file_url, skipping", id);
                }
                post
            })
            .collect();

        let page = Page { returned, posts };
        debug!("List size: {} ({} skipped)", page.posts.len(), page.skipped());
        debug!("Post mapping took {:?}", start.elapsed());

        Ok(page)
    }
}

#[async_trait(?Send)]
impl PostSource for GelbooruSource {
    async fn fetch_page(&self, request: &SearchRequest) -> Result<Page, SourceError> {
        let url = request.to_url(&self.api_url, self.credentials.as_ref());

        let res = self.client.get(&url).send().await?;

        if !res.status().is_success() {
            return Err(SourceError::BadStatus {
                status: res.status().as_u16(),
            });
        }

        let body = res.text().await?;

        Self::map_posts(&body)
    }
}
