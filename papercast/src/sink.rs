use crate::types::{EpisodeRecord, Result};
use quick_xml::escape::escape;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const ANCHOR: &str = "</main>";

/// Outcome of an append attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    Appended,
    MissingDocument,
    MissingAnchor,
}

/// Additive sink over a static HTML page. Fragments go immediately before
/// the first `</main>` and are never removed.
pub struct PublicationSink {
    page: PathBuf,
}

impl PublicationSink {
    pub fn new(page: impl Into<PathBuf>) -> Self {
        Self { page: page.into() }
    }

    pub fn page(&self) -> &Path {
        &self.page
    }

    pub fn append(&self, fragment: &str) -> Result<SinkOutcome> {
        if !self.page.exists() {
            debug!("No page at {}, skipping fragment", self.page.display());
            return Ok(SinkOutcome::MissingDocument);
        }

        let html = std::fs::read_to_string(&self.page)?;
        let Some(at) = html.find(ANCHOR) else {
            warn!("Page {} has no {} anchor, skipping fragment", self.page.display(), ANCHOR);
            return Ok(SinkOutcome::MissingAnchor);
        };

        let mut updated = String::with_capacity(html.len() + fragment.len() + 2);
        updated.push_str(&html[..at]);
        updated.push('\n');
        updated.push_str(fragment);
        updated.push('\n');
        updated.push_str(&html[at..]);
        std::fs::write(&self.page, updated)?;
        Ok(SinkOutcome::Appended)
    }
}

/// Page fragment for one episode: title, build line, player, source link.
pub fn episode_fragment(record: &EpisodeRecord) -> String {
    let title = escape(record.paper.title.as_str());
    let link = escape(record.paper.link.as_str());
    format!(
        r#"<div class="episode">
  <h3>Deep Dive — {title}</h3>
  <div class="text-sm" style="opacity:.7">Generated at {generated} • build {build}</div>
  <audio controls src="{audio}"></audio>
  <ul><li><a href="{link}">{title}</a></li></ul>
</div>"#,
        generated = escape(record.generated_at_utc.as_str()),
        build = escape(record.build_id.as_str()),
        audio = escape(record.audio_file.as_str()),
    )
}

/// Page fragment linking a downloadable file relative to the site root.
pub fn download_fragment(href: &str, label: &str) -> String {
    format!(
        r#"<p><a href="{}">{}</a></p>"#,
        escape(href),
        escape(label)
    )
}
