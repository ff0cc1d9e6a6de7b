//! # Downbooru
//!
//! downbooru is a CLI utility to bulk download images from Gelbooru.
//!
//! Given a set of tags and a minimum safety rating, it walks every rating tier at or above that
//! minimum, pages through all matching posts, downloads each image, drops visual duplicates and
//! writes a `src.json` manifest of what was fetched.
pub mod cli;
pub mod config;
pub mod imageboards;
pub mod logger;
mod progress_bars;

// Export the rating tiers
pub use imageboards::rating::Rating;

pub use imageboards::post::Post;

// Export the seams the queue is generic over
pub use imageboards::{ImageFetcher, Page, PostSource};

// Export the Gelbooru implementations
pub use imageboards::fetcher::HttpImageFetcher;
pub use imageboards::gelbooru::{query::SearchRequest, GelbooruSource};

// Export the duplicate filter
pub use imageboards::dedup::{DedupScope, DuplicateFilter, Fingerprint};

// Export main worker queue
pub use imageboards::queue::{manifest::Manifest, FetchOptions, FetchQueue, FetchSummary};

pub use logger::Verbosity;
