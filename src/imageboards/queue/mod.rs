//! Queue that walks rating tiers and pages, downloads every post, filters duplicates and writes
//! the run manifest.
//!
//! # Example usage
//!
//! ```no_run
//! use downbooru::{config::ApiConfig, *};
//!
//! async fn download_posts() {
//!     let config = ApiConfig::load().await.unwrap();
//!     let client = downbooru::client!(config.timeout()).unwrap();
//!
//!     let queue = FetchQueue::new(
//!         GelbooruSource::new(client.clone(), &config),
//!         HttpImageFetcher::new(client),
//!         Verbosity::Normal,
//!     );
//!
//!     let options = FetchOptions {
//!         tags: vec!["deep rock galactic".to_string()],
//!         min_rating: Rating::Sensitive, // Walks `sensitive`, then `general`
//!         ..Default::default()
//!     };
//!
//!     let summary = queue.run(&options).await.unwrap();
//!     println!("{} saved", summary.saved);
//! }
//! ```
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, error, info, warn};
use tokio::fs::{self, create_dir_all};

use crate::{
    imageboards::{
        dedup::{DedupScope, DuplicateFilter},
        gelbooru::query::SearchRequest,
        post::error::PostError,
        ImageFetcher, Page, PostSource,
    },
    progress_bars::page_bar,
    Post, Rating, Verbosity,
};

use self::{
    error::QueueError,
    manifest::{FetchOutcome, FetchStatus, Manifest},
};

pub mod error;
pub mod manifest;

/// Number of posts requested per page. A page returning fewer ends its tier.
pub const PAGE_SIZE: u16 = 1000;

pub const EXCLUDE_FURRY_TAG: &str = "-furry";

pub const DEFAULT_BASE_DIR: &str = "img";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Tags as the user typed them.
    pub tags: Vec<String>,
    /// Least safe tier to scan. Every tier from here up to `General` is fetched.
    pub min_rating: Rating,
    /// Keep furry-tagged posts instead of excluding them.
    pub include_furry: bool,
    /// Overrides the default `img/<tags>` destination.
    pub output_dir: Option<PathBuf>,
    pub dedup_scope: DedupScope,
}

impl FetchOptions {
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => Path::new(DEFAULT_BASE_DIR).join(self.tags.join("_")),
        }
    }

    /// Destination of a single-post download: `--dir` if given, else `img/post_<id>`.
    pub fn single_post_dir(&self, post_id: u64) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => Path::new(DEFAULT_BASE_DIR).join(format!("post_{}", post_id)),
        }
    }

    /// The tags sent to the API, with the furry exclusion appended once when needed.
    pub fn search_tags(&self) -> Vec<String> {
        let mut tags = self.tags.clone();
        if !self.include_furry {
            tags.push(EXCLUDE_FURRY_TAG.to_string());
        }
        tags
    }
}

/// Counters and manifest location of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub saved: u64,
    pub existing: u64,
    pub duplicates: u64,
    pub failed: u64,
    pub manifest_path: PathBuf,
}

/// What happened to a single post.
#[derive(Debug)]
pub enum PostOutcome {
    Saved,
    /// A file with the target name was already there, nothing was downloaded.
    AlreadyExists,
    /// Visually identical to an image saved earlier in the current scope. Dropped without a trace.
    Duplicate,
    Failed(PostError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchState {
    /// `None` once every tier up to `General` was scanned.
    SelectingTier(Option<Rating>),
    FetchingPage { rating: Rating, page: u32 },
    Done,
}

struct RunState {
    manifest: Manifest,
    filter: DuplicateFilter,
    saved: u64,
    existing: u64,
    duplicates: u64,
    failed: u64,
}

impl RunState {
    fn new() -> Self {
        Self {
            manifest: Manifest::new(),
            filter: DuplicateFilter::new(),
            saved: 0,
            existing: 0,
            duplicates: 0,
            failed: 0,
        }
    }

    fn record(&mut self, post: &Post, outcome: &PostOutcome) {
        let status = match outcome {
            PostOutcome::Saved => {
                self.saved += 1;
                FetchStatus::Ok
            }
            PostOutcome::AlreadyExists => {
                self.existing += 1;
                FetchStatus::Ok
            }
            PostOutcome::Duplicate => {
                self.duplicates += 1;
                return;
            }
            PostOutcome::Failed(_) => {
                self.failed += 1;
                FetchStatus::Error
            }
        };

        self.manifest.record(FetchOutcome {
            post_id: post.id,
            source_url: post.source_url.clone(),
            file_url: post.file_url.clone(),
            status,
        });
    }

    fn into_summary(self, manifest_path: PathBuf) -> FetchSummary {
        FetchSummary {
            saved: self.saved,
            existing: self.existing,
            duplicates: self.duplicates,
            failed: self.failed,
            manifest_path,
        }
    }
}

/// Struct where all the searching, downloading and filtering will take place
pub struct FetchQueue<S, F> {
    source: S,
    fetcher: F,
    verbosity: Verbosity,
    page_size: u16,
}

impl<S: PostSource, F: ImageFetcher> FetchQueue<S, F> {
    pub fn new(source: S, fetcher: F, verbosity: Verbosity) -> Self {
        Self {
            source,
            fetcher,
            verbosity,
            page_size: PAGE_SIZE,
        }
    }

    /// Changes how many posts are requested per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u16) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Scans every tier from `options.min_rating` up to `General` and writes the manifest.
    ///
    /// A failed page request stops the scan. The manifest of everything processed until then is
    /// still written before the error is returned.
    pub async fn run(&self, options: &FetchOptions) -> Result<FetchSummary, QueueError> {
        let output_dir = options.output_dir();
        Self::create_out(&output_dir).await?;

        let tags = options.search_tags();
        debug!("Search tags: {:?}", tags);

        let mut run = RunState::new();
        let mut failure = None;
        let mut state = FetchState::SelectingTier(Some(options.min_rating));

        loop {
            state = match state {
                FetchState::SelectingTier(None) => FetchState::Done,
                FetchState::SelectingTier(Some(rating)) => {
                    info!("Scanning rating {}", rating);
                    if options.dedup_scope == DedupScope::Tier {
                        run.filter.reset();
                    }
                    FetchState::FetchingPage { rating, page: 0 }
                }
                FetchState::FetchingPage { rating, page } => {
                    let request = SearchRequest::new(&tags, rating)
                        .page_size(self.page_size)
                        .page(page);

                    match self.source.fetch_page(&request).await {
                        Ok(Page { returned, posts }) => {
                            info!("Fetched {} images | {} page {}", posts.len(), rating, page);
                            if returned > posts.len() {
                                warn!(
                                    "{} entries without a file were skipped",
                                    returned - posts.len()
                                );
                            }

                            if options.dedup_scope == DedupScope::Page {
                                run.filter.reset();
                            }

                            let bar = page_bar(
                                posts.len() as u64,
                                format!("{} | page {}", rating, page),
                                self.verbosity,
                            );
                            self.process_page(&posts, &output_dir, &mut run, &bar)
                                .await;
                            bar.finish_and_clear();

                            if returned >= self.page_size as usize {
                                FetchState::FetchingPage {
                                    rating,
                                    page: page + 1,
                                }
                            } else {
                                FetchState::SelectingTier(rating.safer())
                            }
                        }
                        Err(source) => {
                            error!("Fetching page {} of rating {} failed: {}", page, rating, source);
                            failure = Some(QueueError::PageFetchError {
                                rating: rating.to_string(),
                                page,
                                source,
                            });
                            FetchState::Done
                        }
                    }
                }
                FetchState::Done => break,
            };
        }

        let manifest_path = run.manifest.write(&output_dir).await?;

        if let Some(err) = failure {
            return Err(err);
        }

        Ok(run.into_summary(manifest_path))
    }

    /// Fetches a single post by id, without rating or pagination, and writes its manifest.
    pub async fn run_single(
        &self,
        post_id: u64,
        options: &FetchOptions,
    ) -> Result<FetchSummary, QueueError> {
        let output_dir = options.single_post_dir(post_id);
        Self::create_out(&output_dir).await?;

        let request = SearchRequest::new::<&str>(&[], Rating::General).post_id(post_id);

        let Page { posts, .. } = self
            .source
            .fetch_page(&request)
            .await
            .map_err(|source| QueueError::PageFetchError {
                rating: "any".to_string(),
                page: 0,
                source,
            })?;

        if posts.is_empty() {
            warn!("Post {} was not found", post_id);
        }

        let mut run = RunState::new();
        let bar = page_bar(
            posts.len() as u64,
            format!("post {}", post_id),
            self.verbosity,
        );
        self.process_page(&posts, &output_dir, &mut run, &bar).await;
        bar.finish_and_clear();

        let manifest_path = run.manifest.write(&output_dir).await?;
        Ok(run.into_summary(manifest_path))
    }

    async fn create_out(dir: &Path) -> Result<(), QueueError> {
        debug!("Target dir: {}", dir.display());
        create_dir_all(dir)
            .await
            .map_err(|source| QueueError::DirCreationError {
                path: dir.display().to_string(),
                source,
            })
    }

    async fn process_page(
        &self,
        posts: &[Post],
        output_dir: &Path,
        run: &mut RunState,
        bar: &ProgressBar,
    ) {
        for (i, post) in posts.iter().enumerate() {
            debug!("Getting image {} {}/{}", post.id, i + 1, posts.len());

            let outcome = self.process_post(post, output_dir, &mut run.filter).await;

            match &outcome {
                PostOutcome::Saved => debug!("Image {} saved", post.id),
                PostOutcome::AlreadyExists => info!("Image {} exists.", post.id),
                PostOutcome::Duplicate => info!("Image {} is a duplicate", post.id),
                PostOutcome::Failed(e) => warn!("Getting image {} failed: {}", post.id, e),
            }

            run.record(post, &outcome);
            bar.inc(1);
        }
    }

    /// Downloads one post into `output_dir`. Never fails: errors become [`PostOutcome::Failed`].
    pub async fn process_post(
        &self,
        post: &Post,
        output_dir: &Path,
        filter: &mut DuplicateFilter,
    ) -> PostOutcome {
        let target = post.target_path(output_dir);

        match fs::try_exists(&target).await {
            Ok(true) => return PostOutcome::AlreadyExists,
            Ok(false) => (),
            Err(e) => return PostOutcome::Failed(e.into()),
        }

        match self.download(post, &target, filter).await {
            Ok(outcome) => outcome,
            Err(e) => {
                Self::remove_partial(&target).await;
                PostOutcome::Failed(e)
            }
        }
    }

    async fn download(
        &self,
        post: &Post,
        target: &Path,
        filter: &mut DuplicateFilter,
    ) -> Result<PostOutcome, PostError> {
        let raw = self.fetcher.fetch_image(&post.file_url).await?;

        let fingerprint = filter.fingerprint_bytes(&raw)?;
        if filter.is_duplicate(&fingerprint) {
            return Ok(PostOutcome::Duplicate);
        }

        debug!("Creating {:?}", target);
        fs::write(target, &raw).await?;

        filter.record(fingerprint);
        Ok(PostOutcome::Saved)
    }

    async fn remove_partial(target: &Path) {
        if let Ok(true) = fs::try_exists(target).await {
            debug!("Removing partial file {}", target.display());
            if let Err(e) = fs::remove_file(target).await {
                error!("Failed to remove partial file {}: {}", target.display(), e);
            }
        }
    }
}
