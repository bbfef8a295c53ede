pub mod types;
pub mod config;
pub mod profile;
pub mod filter;
pub mod script;
pub mod slug;
pub mod narration;
pub mod source;
pub mod store;
pub mod feed;
pub mod sink;
pub mod transcode;
pub mod stitch;
pub mod pipeline;

pub use types::*;
pub use config::{Cli, Command, Settings, SettingsArgs, StitchSettings};
pub use profile::Profile;
pub use narration::{ElevenLabsClient, NarrationConfig, Narrator, VoiceRotation};
pub use source::{ArxivSource, CandidateSource, SourceConfig};
pub use store::{MetadataStore, StoredEpisode};
pub use feed::FeedStateManager;
pub use sink::{PublicationSink, SinkOutcome};
pub use transcode::{FfmpegTranscoder, Transcoder};
pub use pipeline::{run_daily, EpisodeBuilder, RunContext};
