use crate::types::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io/v1";

/// Text-to-speech collaborator. One synchronous request per call, no retry.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Synthesize `text` with `voice_id`, returning the raw audio bytes.
    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>>;
}

/// Round-robin voice assignment: item `i` (1-based) gets
/// `voices[(i - 1) % voices.len()]`.
#[derive(Debug, Clone)]
pub struct VoiceRotation {
    voices: Vec<String>,
}

impl VoiceRotation {
    pub fn new(voices: Vec<String>) -> Result<Self> {
        if voices.is_empty() {
            return Err(PipelineError::Configuration(
                "At least one voice id is required".to_string(),
            ));
        }
        Ok(Self { voices })
    }

    pub fn voice_for(&self, index: usize) -> &str {
        let slot = index.saturating_sub(1) % self.voices.len();
        &self.voices[slot]
    }
}

#[derive(Debug, Clone)]
pub struct NarrationConfig {
    pub api_key: String,
    pub model_id: String,
    pub api_base: String,
    pub timeout_seconds: u64,
    pub stability: f32,
    pub similarity_boost: f32,
}

impl NarrationConfig {
    pub fn new(api_key: String, model_id: String) -> Self {
        Self {
            api_key,
            model_id,
            api_base: ELEVENLABS_API_BASE.to_string(),
            timeout_seconds: 180,
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Serialize)]
struct SynthesisRequest<'a> {
    model_id: &'a str,
    text: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs text-to-speech client.
pub struct ElevenLabsClient {
    client: Client,
    config: NarrationConfig,
}

impl ElevenLabsClient {
    pub fn new(config: NarrationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Narrator for ElevenLabsClient {
    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>> {
        let url = format!("{}/text-to-speech/{}", self.config.api_base, voice_id);
        debug!("Requesting synthesis: voice={} chars={}", voice_id, text.chars().count());

        let body = SynthesisRequest {
            model_id: &self.config.model_id,
            text,
            voice_settings: VoiceSettings {
                stability: self.config.stability,
                similarity_boost: self.config.similarity_boost,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .header("accept", "audio/mpeg")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let error_body = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!("Could not read synthesis error body: {}", e);
                    String::new()
                }
            };
            return Err(PipelineError::synthesis(status.as_u16(), &error_body));
        }

        let audio = response.bytes().await?;
        info!("Synthesized {} bytes with voice {}", audio.len(), voice_id);
        Ok(audio.to_vec())
    }
}
