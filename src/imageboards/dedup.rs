//! Perceptual duplicate filter
//!
//! # Fingerprints
//! Every downloaded image is reduced to a 32x32 grayscale thumbnail, and each pixel becomes one
//! bit: set when it is brighter than the thumbnail's mean. Re-encoded or resized copies of the same
//! picture end up with the same 1024 bits, so two images are treated as duplicates only when their
//! fingerprints are bit-identical.
//!
//! The filter only remembers what it saw during the current [scope](DedupScope). It never looks at
//! files already on disk.
use ahash::AHashSet;
use clap::ValueEnum;
use image::DynamicImage;
use image_hasher::{HashAlg, Hasher, HasherConfig};

use super::post::error::PostError;

const HASH_SIZE: u32 = 32;

/// How long fingerprints are remembered before the filter starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DedupScope {
    /// Forget everything at the start of each fetched page.
    #[default]
    Page,
    /// Forget everything when moving to the next rating tier.
    Tier,
    /// Remember fingerprints for the whole run.
    Run,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Box<[u8]>);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

pub struct DuplicateFilter {
    hasher: Hasher,
    seen: AHashSet<Fingerprint>,
}

impl Default for DuplicateFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl DuplicateFilter {
    pub fn new() -> Self {
        let hasher = HasherConfig::new()
            .hash_size(HASH_SIZE, HASH_SIZE)
            .hash_alg(HashAlg::Mean)
            .to_hasher();

        Self {
            hasher,
            seen: AHashSet::new(),
        }
    }

    pub fn fingerprint(&self, image: &DynamicImage) -> Fingerprint {
        let hash = self.hasher.hash_image(image);
        Fingerprint(hash.as_bytes().into())
    }

    /// Decodes raw file bytes and fingerprints the result.
    pub fn fingerprint_bytes(&self, raw: &[u8]) -> Result<Fingerprint, PostError> {
        let image = image::load_from_memory(raw)?;
        Ok(self.fingerprint(&image))
    }

    #[inline]
    pub fn is_duplicate(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    #[inline]
    pub fn record(&mut self, fingerprint: Fingerprint) {
        self.seen.insert(fingerprint);
    }

    /// Records the fingerprint and returns `true` if it had not been seen before.
    #[inline]
    pub fn check_and_record(&mut self, fingerprint: Fingerprint) -> bool {
        self.seen.insert(fingerprint)
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
