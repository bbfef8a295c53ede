use std::path::{Path, PathBuf};

// Durable document shapes live in the interfaces crate
pub use interfaces::defs::{CandidateItem, EpisodeRecord, RunStatus, SourceSnapshot};

/// On-disk layout of a published site.
#[derive(Debug, Clone)]
pub struct SitePaths {
    pub root: PathBuf,
}

impl SitePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn episodes_dir(&self) -> PathBuf {
        self.root.join("episodes")
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join("meta")
    }

    pub fn index_page(&self) -> PathBuf {
        self.root.join("index.html")
    }

    pub fn feed_document(&self) -> PathBuf {
        self.root.join("podcast.xml")
    }

    pub fn status_document(&self) -> PathBuf {
        self.root.join("last_build.json")
    }

    /// Create the output directories if they are missing.
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.episodes_dir())?;
        std::fs::create_dir_all(self.meta_dir())?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Channel-level fields of the public feed.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: String,
    pub author: String,
    pub explicit: bool,
}

const ERROR_BODY_LIMIT: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Synthesis failed: {status} {body}")]
    Synthesis { status: u16, body: String },

    #[error("Transcode failed: {0}")]
    Transcode(String),

    #[error("Source fetch failed: {0}")]
    Source(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Profile error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("Feed error: {0}")]
    Feed(#[from] rss::Error),
}

impl PipelineError {
    /// Build a synthesis failure, keeping at most the first 200 characters
    /// of the upstream body.
    pub fn synthesis(status: u16, body: &str) -> Self {
        PipelineError::Synthesis {
            status,
            body: body.chars().take(ERROR_BODY_LIMIT).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
