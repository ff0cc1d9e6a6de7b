//! Main representation of a imageboard post
//!
//! # Post
//! A [`Post` struct](Post) is the part of a Gelbooru post record the downloader needs to fetch,
//! name and account for a single image.
use std::{
    fmt::Debug,
    path::{Path, PathBuf},
};

use crate::extract_ext_from_url;

pub mod error;

/// Catchall model for the necessary parts of the imageboard post to properly identify, download and save it.
#[derive(Clone, Eq)]
pub struct Post {
    /// ID number of the post given by the imageboard
    pub id: u64,
    /// Where the artwork was originally posted, as reported by the uploader. Can be empty.
    pub source_url: String,
    /// Direct URL of the original image file located inside the imageboard's server
    pub file_url: String,
    /// File extension, taken from the last dot of the last path segment of `file_url`.
    pub extension: String,
}

impl Debug for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Post")
            .field("Post ID", &self.id)
            .field("Source", &self.source_url)
            .field("Download URL", &self.file_url)
            .field("File Extension", &self.extension)
            .finish()
    }
}

impl PartialEq for Post {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Post {
    pub fn new(id: u64, source_url: impl Into<String>, file_url: impl Into<String>) -> Self {
        let file_url = file_url.into();
        let extension = extract_ext_from_url!(file_url);
        Self {
            id,
            source_url: source_url.into(),
            file_url,
            extension,
        }
    }

    /// Get the final file name of the post for saving.
    #[inline]
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }

    #[inline]
    pub fn target_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::Post;
    use std::path::Path;

    #[test]
    fn extension_comes_from_last_segment() {
        let post = Post::new(
            7,
            "",
            "https://img3.gelbooru.com/images/ab/cd/abcd1234.jpeg",
        );
        assert_eq!(post.extension, "jpeg");
        assert_eq!(post.file_name(), "7.jpeg");
    }

    #[test]
    fn dots_in_directories_are_ignored() {
        let post = Post::new(1, "", "https://cdn.example.v2/images/file.png");
        assert_eq!(post.extension, "png");

        let post = Post::new(2, "", "https://cdn.example.v2/images/noext");
        assert_eq!(post.extension, "noext");
    }

    #[test]
    fn target_path_joins_output_dir() {
        let post = Post::new(42, "src", "https://x/y/z.gif");
        assert_eq!(
            post.target_path(Path::new("img/tag")),
            Path::new("img/tag/42.gif")
        );
    }
}
