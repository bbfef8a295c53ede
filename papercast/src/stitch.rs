use crate::narration::{Narrator, VoiceRotation};
use crate::sink::{self, PublicationSink};
use crate::transcode::Transcoder;
use crate::types::{Result, SitePaths};
use std::path::PathBuf;
use tracing::info;

pub const STITCHED_NAME: &str = "smoketest.mp3";

pub const SMOKE_TEST_LINES: [&str; 4] = [
    "Paper 1 — This is a test line to confirm Text-to-Speech works.",
    "Paper 2 — Rotating to the second voice for this sample sentence.",
    "Paper 3 — Third voice reading, per-paper rotation confirmed.",
    "Paper 4 — Fourth voice completes the rotation. Nice.",
];

/// Narrate each line with the rotating voices, normalize every clip, and
/// concatenate them into `episodes/smoketest.mp3`. Writes no episode
/// records and leaves the feed untouched.
pub async fn stitch_lines(
    site: &SitePaths,
    lines: &[&str],
    narrator: &dyn Narrator,
    voices: &VoiceRotation,
    transcoder: &dyn Transcoder,
) -> Result<PathBuf> {
    site.ensure()?;
    let dir = site.episodes_dir();

    let mut normalized = Vec::with_capacity(lines.len());
    for (offset, line) in lines.iter().enumerate() {
        let index = offset + 1;
        let audio = narrator.synthesize(voices.voice_for(index), line).await?;

        let clip = dir.join(format!("clip_{}.mp3", index));
        tokio::fs::write(&clip, &audio).await?;

        let reencoded = dir.join(format!("re_{}.mp3", index));
        transcoder.reencode(&clip, &reencoded).await?;
        normalized.push(reencoded);
    }

    let output = dir.join(STITCHED_NAME);
    transcoder.concat(&normalized, &output).await?;
    info!("Smoke test built: {}", output.display());

    let page = PublicationSink::new(site.index_page());
    page.append(&sink::download_fragment(
        &format!("episodes/{}", STITCHED_NAME),
        "Download the narration smoke test MP3",
    ))?;

    Ok(output)
}
