use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One unit of upstream metadata, as fetched and before any filtering.
/// Has no identity beyond its link and is never persisted directly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub authors: Vec<String>,
}

/// The parts of a candidate captured at accept time. Candidates are never
/// re-fetched, so this is all an episode ever knows about its source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub title: String,
    pub link: String,
    pub authors: Vec<String>,
}

impl From<&CandidateItem> for SourceSnapshot {
    fn from(item: &CandidateItem) -> Self {
        Self {
            title: item.title.trim().to_owned(),
            link: item.link.clone(),
            authors: item.authors.clone(),
        }
    }
}

/// Durable record of one narrated episode. Written once, never mutated.
///
/// `recorded_at` and `run_id` are absent from records written before they
/// were introduced; readers must tolerate that.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub title: String,
    pub slug: String,
    pub generated_at_utc: String,
    pub build_id: String,
    pub audio_url: String,
    pub audio_file: String,
    pub filesize: u64,
    pub paper: SourceSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
}

/// Per-run summary for external observability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatus {
    pub generated_at_utc: String,
    pub created_count: usize,
    pub created_slugs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
}

impl RunStatus {
    pub fn from_records(generated_at_utc: &str, run_id: Uuid, records: &[EpisodeRecord]) -> Self {
        Self {
            generated_at_utc: generated_at_utc.to_owned(),
            created_count: records.len(),
            created_slugs: records.iter().map(|r| r.slug.clone()).collect(),
            run_id: Some(run_id),
        }
    }
}
