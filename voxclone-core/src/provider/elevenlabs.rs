//! ElevenLabs voice cloning and text-to-speech client

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::provider::VoiceProvider;
use super::types::VoiceSettings;
use crate::settings::config::{DEFAULT_ELEVENLABS_BASE_URL, DEFAULT_MODEL_ID};

#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub base_url: String,
    pub model_id: String,
    /// Voice settings sent with every synthesis request
    pub synthesis_settings: VoiceSettings,
    pub timeout: Duration,
}

impl ElevenLabsConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_ELEVENLABS_BASE_URL.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            synthesis_settings: VoiceSettings::new(0.6, 0.85),
            timeout: Duration::from_secs(300),
        }
    }
}

pub struct ElevenLabs {
    config: ElevenLabsConfig,
    client: Client,
}

impl ElevenLabs {
    pub fn new(config: ElevenLabsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn check_status(response: Response, action: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(%status, %body, "ElevenLabs {action} failed");
        anyhow::bail!("ElevenLabs API error {status}: {body}");
    }
}

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Deserialize)]
struct AddVoiceResponse {
    #[serde(default)]
    voice_id: Option<String>,
}

/// MIME type for a sample file, from its extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("wav") => "audio/wav",
        Some("mp3") | Some("mpga") => "audio/mpeg",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("webm") => "audio/webm",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl VoiceProvider for ElevenLabs {
    async fn clone_voice(
        &self,
        name: &str,
        description: &str,
        sample_path: &Path,
    ) -> Result<String> {
        let file_name = sample_path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Sample path has no file name")?
            .to_string();

        let sample = tokio::fs::read(sample_path)
            .await
            .with_context(|| format!("Failed to read sample {sample_path:?}"))?;

        let part = Part::bytes(sample)
            .file_name(file_name)
            .mime_str(guess_mime_type(sample_path))
            .context("Invalid sample MIME type")?;

        let form = Form::new()
            .text("name", name.to_string())
            .text("description", description.to_string())
            .part("files", part);

        let response = self
            .client
            .post(self.url("voices/add"))
            .header("xi-api-key", &self.config.api_key)
            .header("Accept", "application/json")
            .multipart(form)
            .send()
            .await
            .context("Failed to send clone request to ElevenLabs")?;

        let response = Self::check_status(response, "voice clone").await?;

        let body: AddVoiceResponse = response
            .json()
            .await
            .context("Failed to parse clone response")?;

        body.voice_id
            .filter(|id| !id.is_empty())
            .context("ElevenLabs clone response did not include a voice_id")
    }

    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>> {
        let request_body = SynthesizeRequest {
            text,
            model_id: &self.config.model_id,
            voice_settings: self.config.synthesis_settings,
        };

        let response = self
            .client
            .post(self.url(&format!("text-to-speech/{voice_id}")))
            .header("xi-api-key", &self.config.api_key)
            .header("Accept", "audio/mpeg")
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to ElevenLabs")?;

        let response = Self::check_status(response, "speech synthesis").await?;

        let bytes = response
            .bytes()
            .await
            .context("Failed to read audio bytes")?
            .to_vec();

        Ok(bytes)
    }

    async fn tune_settings(&self, voice_id: &str, settings: VoiceSettings) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("voices/{voice_id}/settings/edit")))
            .header("xi-api-key", &self.config.api_key)
            .json(&settings)
            .send()
            .await
            .context("Failed to send settings to ElevenLabs")?;

        Self::check_status(response, "voice tuning").await?;
        Ok(())
    }
}
