use serde::Deserialize;

use crate::Post;

#[derive(Deserialize, Debug)]
pub struct GelbooruTopLevel {
    /// Missing entirely when a search has no results.
    pub post: Option<Vec<GelbooruPost>>,
}

#[derive(Deserialize, Debug)]
pub struct GelbooruPost {
    pub id: u64,
    pub source: Option<String>,
    pub file_url: Option<String>,
}

impl GelbooruPost {
    pub fn into_post(self) -> Option<Post> {
        let file_url = self.file_url.filter(|u| !u.is_empty())?;
        Some(Post::new(self.id, self.source.unwrap_or_default(), file_url))
    }
}
