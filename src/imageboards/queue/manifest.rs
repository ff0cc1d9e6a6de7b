//! The `src.json` manifest written at the end of every run.
//!
//! On disk it is a single JSON object keyed by post id, each value being a
//! `[source_url, file_url, status]` triple:
//!
//! ```json
//! {"8123": ["https://pixiv.net/...", "https://img3.gelbooru.com/...", "OK"]}
//! ```
use std::{
    fmt,
    path::{Path, PathBuf},
};

use ahash::AHashMap;
use log::debug;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use tokio::fs;

use super::error::QueueError;

pub const MANIFEST_FILE: &str = "src.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

/// Result of processing a single post during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub post_id: u64,
    pub source_url: String,
    pub file_url: String,
    pub status: FetchStatus,
}

#[derive(Serialize, Deserialize)]
struct Entry(String, String, FetchStatus);

/// Insertion-ordered map of [`FetchOutcome`]s with unique post ids.
#[derive(Debug, Default, Clone)]
pub struct Manifest {
    entries: Vec<FetchOutcome>,
    index: AHashMap<u64, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an outcome. Recording an id a second time replaces the old outcome in place.
    pub fn record(&mut self, outcome: FetchOutcome) {
        match self.index.get(&outcome.post_id) {
            Some(&pos) => self.entries[pos] = outcome,
            None => {
                self.index.insert(outcome.post_id, self.entries.len());
                self.entries.push(outcome);
            }
        }
    }

    pub fn get(&self, post_id: u64) -> Option<&FetchOutcome> {
        self.index.get(&post_id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, post_id: u64) -> bool {
        self.index.contains_key(&post_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FetchOutcome> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, QueueError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Writes the manifest to `<dir>/src.json`, replacing any previous one.
    pub async fn write(&self, dir: &Path) -> Result<PathBuf, QueueError> {
        let path = dir.join(MANIFEST_FILE);
        debug!("Writing {} entries to {}", self.len(), path.display());
        fs::write(&path, self.to_json()?).await?;
        Ok(path)
    }

    pub async fn read(path: &Path) -> Result<Self, QueueError> {
        let raw = fs::read(path).await?;
        serde_json::from_slice(&raw).map_err(|source| QueueError::ManifestDecodeError {
            file: path.display().to_string(),
            source,
        })
    }
}

impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for o in &self.entries {
            map.serialize_entry(
                &o.post_id,
                &Entry(o.source_url.clone(), o.file_url.clone(), o.status),
            )?;
        }
        map.end()
    }
}

struct ManifestVisitor;

impl<'de> Visitor<'de> for ManifestVisitor {
    type Value = Manifest;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of post ids to [source, file_url, status]")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Manifest, A::Error> {
        let mut manifest = Manifest::new();
        while let Some((post_id, Entry(source_url, file_url, status))) =
            access.next_entry::<u64, Entry>()?
        {
            manifest.record(FetchOutcome {
                post_id,
                source_url,
                file_url,
                status,
            });
        }
        Ok(manifest)
    }
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ManifestVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn outcome(id: u64, status: FetchStatus) -> FetchOutcome {
        FetchOutcome {
            post_id: id,
            source_url: format!("https://source/{id}"),
            file_url: format!("https://img/{id}.png"),
            status,
        }
    }

    #[test]
    fn serializes_as_id_keyed_triples() {
        let mut m = Manifest::new();
        m.record(outcome(5, FetchStatus::Ok));
        m.record(outcome(2, FetchStatus::Error));

        assert_eq!(
            m.to_json().unwrap(),
            r#"{"5":["https://source/5","https://img/5.png","OK"],"2":["https://source/2","https://img/2.png","ERROR"]}"#
        );
    }

    #[test]
    fn rerecording_keeps_position() {
        let mut m = Manifest::new();
        m.record(outcome(1, FetchStatus::Error));
        m.record(outcome(2, FetchStatus::Ok));
        m.record(outcome(1, FetchStatus::Ok));

        let ids: Vec<_> = m.iter().map(|o| o.post_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(m.get(1).unwrap().status, FetchStatus::Ok);
    }

    #[tokio::test]
    async fn write_then_read_preserves_entries_and_order() {
        let dir = TempDir::new("manifest").unwrap();
        let mut m = Manifest::new();
        for id in [30, 10, 20] {
            m.record(outcome(id, FetchStatus::Ok));
        }
        m.record(outcome(40, FetchStatus::Error));

        let path = m.write(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE));

        let back = Manifest::read(&path).await.unwrap();
        let got: Vec<_> = back.iter().cloned().collect();
        let want: Vec<_> = m.iter().cloned().collect();
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn reading_garbage_is_a_decode_error() {
        let dir = TempDir::new("manifest").unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        tokio::fs::write(&path, b"[]").await.unwrap();

        assert!(matches!(
            Manifest::read(&path).await,
            Err(QueueError::ManifestDecodeError { .. })
        ));
    }
}
