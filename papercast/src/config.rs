use crate::narration::{NarrationConfig, VoiceRotation};
use crate::profile::Profile;
use crate::source::SourceConfig;
use crate::types::{ChannelInfo, PipelineError, Result, SitePaths};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

/// Command-line arguments. Every setting can also come from the
/// environment.
#[derive(Parser, Debug)]
#[command(name = "papercast")]
#[command(about = "Builds a narrated research-paper podcast feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Fetch, filter, narrate, and republish the feed (default)
    Build,
    /// Narrate a few fixed lines with rotating voices and stitch them into one file
    SmokeTest,
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Public base URL of the published site
    #[arg(long, env = "SITE_BASE_URL")]
    pub site_base_url: Option<String>,

    #[arg(long, env = "PODCAST_TITLE", default_value = "Random Prompt Generator")]
    pub podcast_title: String,

    #[arg(long, env = "PODCAST_TAGLINE", default_value = "Where justice meets the machine.")]
    pub podcast_tagline: String,

    #[arg(long, env = "PODCAST_AUTHOR", default_value = "Canto Chao")]
    pub podcast_author: String,

    #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    pub elevenlabs_api_key: Option<String>,

    /// Comma-separated voice ids, assigned round-robin
    #[arg(long, env = "ELEVENLABS_VOICE_IDS")]
    pub elevenlabs_voice_ids: Option<String>,

    #[arg(long, env = "ELEVENLABS_MODEL_ID", default_value = "eleven_multilingual_v2")]
    pub elevenlabs_model_id: String,

    #[arg(long, env = "PROFILE_PATH", default_value = "profiles/caleb.yaml")]
    pub profile_path: PathBuf,

    /// Number of episodes kept in the public feed
    #[arg(long, env = "MAX_RSS_ITEMS", default_value_t = 50)]
    pub max_rss_items: usize,

    /// Overrides the profile's per-run item cap
    #[arg(long, env = "MAX_ITEMS_PER_RUN")]
    pub max_items_per_run: Option<usize>,

    #[arg(long, env = "SITE_DIR", default_value = "site")]
    pub site_dir: PathBuf,

    #[arg(long, env = "ARXIV_CATEGORY", default_value = "cs.AI")]
    pub arxiv_category: String,

    #[arg(long, env = "ARXIV_MAX_RESULTS", default_value_t = 60)]
    pub arxiv_max_results: usize,
}

/// Validated run configuration, built once at startup and passed down.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub channel: ChannelInfo,
    pub narration: NarrationConfig,
    pub voices: VoiceRotation,
    pub profile: Profile,
    pub retention_cap: usize,
    pub site: SitePaths,
    pub source: SourceConfig,
}

impl Settings {
    /// Validate every required value and load the profile. Nothing here
    /// touches the network.
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        let (base_url, narration, voices) = validate_narration(args)?;

        let mut profile = Profile::load(&args.profile_path)?;
        if let Some(cap) = args.max_items_per_run {
            profile = profile.with_max_items(cap);
        }

        Ok(Self {
            channel: ChannelInfo {
                title: args.podcast_title.clone(),
                link: base_url.clone(),
                description: args.podcast_tagline.clone(),
                language: "en-us".to_string(),
                author: args.podcast_author.clone(),
                explicit: false,
            },
            narration,
            voices,
            profile,
            retention_cap: args.max_rss_items,
            site: SitePaths::new(args.site_dir.clone()),
            source: SourceConfig {
                category: args.arxiv_category.clone(),
                max_results: args.arxiv_max_results,
                ..SourceConfig::default()
            },
            base_url,
        })
    }
}

/// What the stitched smoke test needs: no profile, no source.
#[derive(Debug, Clone)]
pub struct StitchSettings {
    pub narration: NarrationConfig,
    pub voices: VoiceRotation,
    pub site: SitePaths,
}

impl StitchSettings {
    pub fn from_args(args: &SettingsArgs) -> Result<Self> {
        let (_, narration, voices) = validate_narration(args)?;
        Ok(Self {
            narration,
            voices,
            site: SitePaths::new(args.site_dir.clone()),
        })
    }
}

fn validate_narration(args: &SettingsArgs) -> Result<(String, NarrationConfig, VoiceRotation)> {
    let base_url = validate_base_url(args.site_base_url.as_deref())?;

    let api_key = args
        .elevenlabs_api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| missing("ELEVENLABS_API_KEY"))?
        .to_string();

    let voices = parse_voice_ids(args.elevenlabs_voice_ids.as_deref().unwrap_or(""));
    if voices.is_empty() {
        return Err(missing("ELEVENLABS_VOICE_IDS"));
    }
    let voices = VoiceRotation::new(voices)?;

    let narration = NarrationConfig::new(api_key, args.elevenlabs_model_id.clone());
    Ok((base_url, narration, voices))
}

fn missing(name: &str) -> PipelineError {
    PipelineError::Configuration(format!("Missing {}", name))
}

/// Require an absolute http(s) URL; strip trailing slashes.
pub fn validate_base_url(raw: Option<&str>) -> Result<String> {
    let trimmed = raw
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("SITE_BASE_URL"))?;

    let parsed = Url::parse(trimmed).map_err(|e| {
        PipelineError::Configuration(format!("Invalid SITE_BASE_URL {}: {}", trimmed, e))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PipelineError::Configuration(format!(
            "SITE_BASE_URL must be http(s): {}",
            trimmed
        )));
    }

    Ok(trimmed.to_string())
}

pub fn parse_voice_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
