pub mod defs;

pub use defs::{CandidateItem, EpisodeRecord, RunStatus, SourceSnapshot};
