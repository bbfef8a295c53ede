#![allow(dead_code)]

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use papercast::types::{CandidateItem, EpisodeRecord, PipelineError, Result, SourceSnapshot};
use papercast::{CandidateSource, Narrator};
use std::sync::{Mutex, Once};

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn item(title: &str, summary: &str) -> CandidateItem {
    CandidateItem {
        title: title.to_string(),
        summary: summary.to_string(),
        link: format!("https://arxiv.org/abs/{}", title.len()),
        authors: vec!["Ada Lovelace".to_string()],
    }
}

/// Narrator that returns the text as bytes and remembers every call.
/// Fails with a 500 on the `fail_on`-th call (1-based) when set.
pub struct MockNarrator {
    pub calls: Mutex<Vec<(String, String)>>,
    pub fail_on: Option<usize>,
}

impl MockNarrator {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(call: usize) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(call),
        }
    }

    pub fn voices_used(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(v, _)| v.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Narrator for MockNarrator {
    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((voice_id.to_string(), text.to_string()));
        if Some(calls.len()) == self.fail_on {
            return Err(PipelineError::synthesis(500, "upstream exploded"));
        }
        Ok(format!("AUDIO[{voice_id}]:{text}").into_bytes())
    }
}

pub struct MockSource {
    pub items: Vec<CandidateItem>,
}

#[async_trait]
impl CandidateSource for MockSource {
    fn source_name(&self) -> String {
        "mock".to_string()
    }

    async fn fetch(&self) -> Result<Vec<CandidateItem>> {
        Ok(self.items.clone())
    }
}

pub fn record(slug: &str, recorded_at: Option<DateTime<Utc>>) -> EpisodeRecord {
    EpisodeRecord {
        title: format!("Deep Dive — {slug}"),
        slug: slug.to_string(),
        generated_at_utc: "2025-03-14 06:30 UTC".to_string(),
        build_id: format!("1741933800-{}", slug.len()),
        audio_url: format!("https://example.org/episodes/{slug}.mp3"),
        audio_file: format!("episodes/{slug}.mp3"),
        filesize: 1024,
        paper: SourceSnapshot {
            title: slug.to_string(),
            link: "https://arxiv.org/abs/2503.00001".to_string(),
            authors: vec![],
        },
        recorded_at,
        run_id: None,
    }
}
