use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use super::types::VoiceSettings;

/// Client for a voice cloning and speech synthesis service.
///
/// Implementations hold no per-request state and are shared across requests.
#[async_trait]
pub trait VoiceProvider: Send + Sync {
    /// Clone a voice from a local sample file. Returns the provider's voice id.
    async fn clone_voice(&self, name: &str, description: &str, sample_path: &Path)
        -> Result<String>;

    /// Synthesize `text` with a previously cloned voice. Returns encoded audio.
    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>>;

    /// Adjust provider-side settings of a voice
    async fn tune_settings(&self, voice_id: &str, settings: VoiceSettings) -> Result<()>;
}
