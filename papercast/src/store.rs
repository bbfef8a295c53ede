use crate::types::{EpisodeRecord, Result, SitePaths};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, info, warn};

/// An episode record as found on disk, with its file modification time.
#[derive(Debug, Clone)]
pub struct StoredEpisode {
    pub record: EpisodeRecord,
    pub modified: SystemTime,
}

impl StoredEpisode {
    /// Ordering key: the recorded timestamp when the record carries one,
    /// otherwise the file modification time.
    pub fn recency(&self) -> DateTime<Utc> {
        self.record
            .recorded_at
            .unwrap_or_else(|| DateTime::<Utc>::from(self.modified))
    }
}

/// Directory-backed store: one JSON document per episode under `meta/`,
/// one audio artifact per episode under `episodes/`.
pub struct MetadataStore {
    paths: SitePaths,
}

impl MetadataStore {
    pub fn new(paths: SitePaths) -> Self {
        Self { paths }
    }

    pub fn open(paths: SitePaths) -> Result<Self> {
        paths.ensure()?;
        Ok(Self::new(paths))
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn audio_name(slug: &str) -> String {
        format!("{slug}.mp3")
    }

    pub fn record_path(&self, slug: &str) -> PathBuf {
        self.paths.meta_dir().join(format!("{slug}.json"))
    }

    /// Write the audio artifact and return its size as read back from disk.
    pub fn write_audio(&self, slug: &str, audio: &[u8]) -> Result<u64> {
        let path = self.paths.episodes_dir().join(Self::audio_name(slug));
        std::fs::write(&path, audio)?;
        let size = std::fs::metadata(&path)?.len();
        debug!("Wrote {} ({} bytes)", path.display(), size);
        Ok(size)
    }

    /// Persist one record, keyed by slug.
    pub fn persist(&self, record: &EpisodeRecord) -> Result<PathBuf> {
        let path = self.record_path(&record.slug);
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;
        info!("Persisted episode record {}", path.display());
        Ok(path)
    }

    /// Every record currently in the store, in no particular order.
    /// Documents that cannot be parsed are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<StoredEpisode>> {
        let dir = self.paths.meta_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut episodes = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let modified = entry.metadata()?.modified()?;
            let raw = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<EpisodeRecord>(&raw) {
                Ok(record) => episodes.push(StoredEpisode { record, modified }),
                Err(e) => warn!("Skipping unreadable record {}: {}", path.display(), e),
            }
        }

        debug!("Loaded {} records from {}", episodes.len(), dir.display());
        Ok(episodes)
    }
}
