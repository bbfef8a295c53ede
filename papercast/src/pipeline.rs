use crate::config::Settings;
use crate::feed::FeedStateManager;
use crate::filter;
use crate::narration::{Narrator, VoiceRotation};
use crate::script;
use crate::sink::{self, PublicationSink, SinkOutcome};
use crate::slug;
use crate::source::CandidateSource;
use crate::store::MetadataStore;
use crate::types::{CandidateItem, EpisodeRecord, Result, RunStatus, SourceSnapshot};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// Run-wide identity shared by every record of one invocation.
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl RunContext {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
        }
    }

    pub fn generated_at_utc(&self) -> String {
        self.started_at.format(GENERATED_AT_FORMAT).to_string()
    }
}

/// Stand-in candidate used when nothing passes the filter, so every run
/// produces at least one episode.
pub fn no_matches_item(base_url: &str) -> CandidateItem {
    CandidateItem {
        title: "No matching papers today".to_string(),
        summary: "No new entries matched your profile.".to_string(),
        link: base_url.to_string(),
        authors: Vec::new(),
    }
}

/// Turns accepted candidates into narrated, persisted episodes, in order.
pub struct EpisodeBuilder {
    store: MetadataStore,
    narrator: Arc<dyn Narrator>,
    voices: VoiceRotation,
    sink: PublicationSink,
    base_url: String,
}

impl EpisodeBuilder {
    pub fn new(
        store: MetadataStore,
        narrator: Arc<dyn Narrator>,
        voices: VoiceRotation,
        base_url: impl Into<String>,
    ) -> Self {
        let sink = PublicationSink::new(store.paths().index_page());
        Self {
            store,
            narrator,
            voices,
            sink,
            base_url: base_url.into(),
        }
    }

    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Build one episode per candidate. The first synthesis failure aborts
    /// the rest; episodes persisted before it stay on disk.
    pub async fn build(
        &self,
        candidates: Vec<CandidateItem>,
        run: &RunContext,
    ) -> Result<Vec<EpisodeRecord>> {
        let candidates = if candidates.is_empty() {
            info!("No candidates matched, substituting placeholder episode");
            vec![no_matches_item(&self.base_url)]
        } else {
            candidates
        };

        let generated_at = run.generated_at_utc();
        let run_date = run.started_at.date_naive();
        let mut last_recorded: Option<DateTime<Utc>> = None;
        let mut created = Vec::with_capacity(candidates.len());
        let mut used_slugs = HashSet::with_capacity(candidates.len());

        for (offset, item) in candidates.iter().enumerate() {
            let index = offset + 1;
            let title = match item.title.trim() {
                "" => format!("Paper {}", index),
                t => t.to_string(),
            };
            let slug = slug::unique_in_run(
                slug::episode_slug(run_date, &title, run.started_at),
                &used_slugs,
                index,
            );
            used_slugs.insert(slug.clone());
            let build_id = slug::build_id(run.started_at, index);
            let voice_id = self.voices.voice_for(index);

            info!("[{}/{}] {} (voice {})", index, candidates.len(), slug, voice_id);

            let text = script::compose(item);
            let audio = self.narrator.synthesize(voice_id, &text).await.map_err(|e| {
                error!("Synthesis failed for {}: {}", slug, e);
                e
            })?;
            let filesize = self.store.write_audio(&slug, &audio)?;

            let recorded_at = next_recorded_at(last_recorded);
            last_recorded = Some(recorded_at);

            let audio_name = MetadataStore::audio_name(&slug);
            let record = EpisodeRecord {
                title: format!("Deep Dive — {}", title),
                slug: slug.clone(),
                generated_at_utc: generated_at.clone(),
                build_id,
                audio_url: format!("{}/episodes/{}", self.base_url, audio_name),
                audio_file: format!("episodes/{}", audio_name),
                filesize,
                paper: SourceSnapshot {
                    title: title.clone(),
                    ..SourceSnapshot::from(item)
                },
                recorded_at: Some(recorded_at),
                run_id: Some(run.run_id),
            };
            self.store.persist(&record)?;

            if self.sink.append(&sink::episode_fragment(&record))? == SinkOutcome::Appended {
                info!("Appended {} to {}", slug, self.sink.page().display());
            }

            created.push(record);
        }

        Ok(created)
    }
}

/// Strictly after `previous`, and never behind the wall clock.
fn next_recorded_at(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match previous {
        Some(prev) if now <= prev => prev + Duration::nanoseconds(1),
        _ => now,
    }
}

/// One full scheduled run: fetch, select, build, rebuild the feed, and
/// write the status document.
pub async fn run_daily(
    settings: &Settings,
    source: &dyn CandidateSource,
    narrator: Arc<dyn Narrator>,
) -> Result<RunStatus> {
    let run = RunContext::new(Utc::now());
    info!("Starting run {} at {}", run.run_id, run.generated_at_utc());

    let store = MetadataStore::open(settings.site.clone())?;

    let fetched = source.fetch().await?;
    info!("{} returned {} candidates", source.source_name(), fetched.len());
    let selected = filter::select(fetched, &settings.profile);

    let builder = EpisodeBuilder::new(
        store,
        narrator,
        settings.voices.clone(),
        settings.base_url.clone(),
    );
    let created = builder.build(selected, &run).await?;

    let feed = FeedStateManager::new(settings.channel.clone(), settings.retention_cap);
    feed.publish(builder.store(), Utc::now())?;

    let status = RunStatus::from_records(&run.generated_at_utc(), run.run_id, &created);
    let status_path = settings.site.status_document();
    std::fs::write(&status_path, serde_json::to_string_pretty(&status)?)?;
    info!("Created {} episode(s)", status.created_count);

    Ok(status)
}
