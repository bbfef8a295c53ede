use crate::types::{PipelineError, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_MAX_ITEMS: usize = 12;

/// Topic profile: keyword sets plus the per-run item cap.
///
/// All keywords are stored lowercased. `exclude` always wins over
/// `include` and `conditional`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub include: BTreeSet<String>,
    pub exclude: BTreeSet<String>,
    pub conditional: BTreeSet<String>,
    pub max_items_per_run: usize,
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(default)]
    include_topics: Vec<String>,
    #[serde(default)]
    exclude_topics: Vec<String>,
    #[serde(default)]
    conditional_includes: Vec<String>,
    #[serde(default)]
    max_papers_per_episode: Option<usize>,
}

impl Profile {
    pub fn new<I, E, C, S>(include: I, exclude: E, conditional: C, max_items_per_run: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        C: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            include: normalize(include),
            exclude: normalize(exclude),
            conditional: normalize(conditional),
            max_items_per_run,
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        let parsed: RawProfile = serde_norway::from_str(raw)?;
        Ok(Self::new(
            parsed.include_topics,
            parsed.exclude_topics,
            parsed.conditional_includes,
            parsed.max_papers_per_episode.unwrap_or(DEFAULT_MAX_ITEMS),
        ))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::Configuration(format!(
                "Missing profile: {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!("Unreadable profile {}: {}", path.display(), e))
        })?;
        let profile = Self::from_yaml(&raw).map_err(|e| {
            PipelineError::Configuration(format!("Invalid profile {}: {}", path.display(), e))
        })?;

        info!(
            "Loaded profile {} ({} include, {} exclude, {} conditional, cap {})",
            path.display(),
            profile.include.len(),
            profile.exclude.len(),
            profile.conditional.len(),
            profile.max_items_per_run
        );
        Ok(profile)
    }

    /// Replace the per-run cap, e.g. from a command-line override.
    pub fn with_max_items(mut self, max_items_per_run: usize) -> Self {
        debug!(
            "Overriding profile cap {} -> {}",
            self.max_items_per_run, max_items_per_run
        );
        self.max_items_per_run = max_items_per_run;
        self
    }
}

fn normalize<I, S>(words: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}
