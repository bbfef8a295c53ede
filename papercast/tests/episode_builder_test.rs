mod common;

use chrono::{TimeZone, Utc};
use common::{init_tracing, item, MockNarrator};
use papercast::filter::select;
use papercast::types::{PipelineError, Result, SitePaths};
use papercast::{EpisodeBuilder, MetadataStore, Profile, RunContext, VoiceRotation};
use std::sync::Arc;
use tempfile::TempDir;

fn run_context() -> RunContext {
    RunContext::new(Utc.with_ymd_and_hms(2025, 3, 14, 6, 30, 0).unwrap())
}

fn builder(dir: &TempDir, narrator: Arc<MockNarrator>, voices: &[&str]) -> Result<EpisodeBuilder> {
    let store = MetadataStore::open(SitePaths::new(dir.path()))?;
    let voices = VoiceRotation::new(voices.iter().map(|v| v.to_string()).collect())?;
    Ok(EpisodeBuilder::new(store, narrator, voices, "https://example.org/cast"))
}

fn meta_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path().join("meta")).unwrap().count()
}

#[tokio::test]
async fn test_builds_one_record_and_artifact_per_item() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::new());
    let builder = builder(&dir, narrator.clone(), &["v1"])?;

    let records = builder
        .build(
            vec![item("AI Safety Advances", "We propose X. It works."), item("Second", "")],
            &run_context(),
        )
        .await?;

    assert_eq!(records.len(), 2);
    let first = &records[0];
    assert_eq!(first.slug, "2025-03-14-ai-safety-advances");
    assert_eq!(first.title, "Deep Dive — AI Safety Advances");
    assert_eq!(first.generated_at_utc, "2025-03-14 06:30 UTC");
    assert_eq!(first.build_id, "1741933800-1");
    assert_eq!(records[1].build_id, "1741933800-2");
    assert_eq!(
        first.audio_url,
        "https://example.org/cast/episodes/2025-03-14-ai-safety-advances.mp3"
    );
    assert_eq!(first.audio_file, "episodes/2025-03-14-ai-safety-advances.mp3");
    assert_eq!(first.paper.authors, vec!["Ada Lovelace".to_string()]);

    let audio = std::fs::read(dir.path().join(&first.audio_file))?;
    assert_eq!(first.filesize, audio.len() as u64);

    // every record in a run shares the timestamp but is individually ordered
    assert_eq!(records[0].generated_at_utc, records[1].generated_at_utc);
    assert!(records[0].recorded_at < records[1].recorded_at);
    assert_eq!(records[0].run_id, records[1].run_id);

    let persisted = builder.store().load_all()?;
    assert_eq!(persisted.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_voices_assigned_round_robin() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::new());
    let builder = builder(&dir, narrator.clone(), &["a", "b", "c"])?;

    let items = (1..=5).map(|i| item(&format!("Paper number {i}"), "")).collect();
    builder.build(items, &run_context()).await?;

    assert_eq!(narrator.voices_used(), vec!["a", "b", "c", "a", "b"]);
    Ok(())
}

#[tokio::test]
async fn test_colliding_slugs_keep_every_item() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::new());
    let builder = builder(&dir, narrator.clone(), &["v1"])?;

    // titles with nothing sluggable share the timestamp fallback
    let records = builder
        .build(
            vec![
                item("量子计算的安全", "First."),
                item("機械学習と法", "Second."),
                item("Same Title", ""),
                item("Same Title", ""),
            ],
            &run_context(),
        )
        .await?;

    let slugs: Vec<&str> = records.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "2025-03-14-ep-1741933800",
            "2025-03-14-ep-1741933800-2",
            "2025-03-14-same-title",
            "2025-03-14-same-title-4",
        ]
    );
    assert_eq!(meta_count(&dir), 4);
    assert_eq!(std::fs::read_dir(dir.path().join("episodes"))?.count(), 4);
    assert_eq!(records[1].paper.title, "機械学習と法");
    Ok(())
}

#[tokio::test]
async fn test_zero_candidates_still_produce_one_episode() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::new());
    let builder = builder(&dir, narrator.clone(), &["v1"])?;

    let records = builder.build(Vec::new(), &run_context()).await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].slug, "2025-03-14-no-matching-papers-today");
    assert_eq!(records[0].paper.link, "https://example.org/cast");
    assert_eq!(meta_count(&dir), 1);
    assert_eq!(narrator.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_synthesis_failure_aborts_but_keeps_earlier_records() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::failing_on(2));
    let builder = builder(&dir, narrator.clone(), &["v1"])?;

    let result = builder
        .build(
            vec![item("One", ""), item("Two", ""), item("Three", "")],
            &run_context(),
        )
        .await;

    match result {
        Err(PipelineError::Synthesis { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected synthesis failure, got {other:?}"),
    }
    assert_eq!(narrator.call_count(), 2, "no calls after the failure");
    assert_eq!(meta_count(&dir), 1);
    assert!(dir.path().join("meta/2025-03-14-one.json").exists());
    assert!(!dir.path().join("episodes/2025-03-14-two.mp3").exists());
    Ok(())
}

#[tokio::test]
async fn test_cap_bounds_synthesis_calls() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::new());
    let builder = builder(&dir, narrator.clone(), &["v1"])?;

    let profile = Profile::new(vec!["safety"], Vec::new(), Vec::new(), 2);
    let fetched = (1..=6).map(|i| item(&format!("Safety {i}"), "")).collect();
    builder.build(select(fetched, &profile), &run_context()).await?;

    assert_eq!(narrator.call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_page_fragments_appended_only_when_anchor_present() -> Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let narrator = Arc::new(MockNarrator::new());
    let builder = builder(&dir, narrator.clone(), &["v1"])?;
    let page = dir.path().join("index.html");

    // no page: nothing is created
    builder.build(vec![item("Quiet run", "")], &run_context()).await?;
    assert!(!page.exists());

    std::fs::write(&page, "<html><main><h1>Feed</h1></main></html>")?;
    builder
        .build(vec![item("Tags <b> & Friends", "")], &run_context())
        .await?;
    let html = std::fs::read_to_string(&page)?;
    assert!(html.contains("Deep Dive — Tags &lt;b&gt; &amp; Friends"));
    assert!(html.contains(r#"<audio controls src="episodes/2025-03-14-tags-b-friends.mp3"></audio>"#));
    assert!(html.find("class=\"episode\"").unwrap() < html.find("</main>").unwrap());

    // fragments accumulate across runs
    builder.build(vec![item("Another", "")], &run_context()).await?;
    let html = std::fs::read_to_string(&page)?;
    assert_eq!(html.matches("class=\"episode\"").count(), 2);

    std::fs::write(&page, "<html><body>no anchor</body></html>")?;
    builder.build(vec![item("Skipped", "")], &run_context()).await?;
    assert_eq!(std::fs::read_to_string(&page)?, "<html><body>no anchor</body></html>");
    Ok(())
}
