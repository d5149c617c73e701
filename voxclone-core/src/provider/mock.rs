use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::provider::VoiceProvider;
use super::types::VoiceSettings;

/// Mock behavior for the mock provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MockBehavior {
    /// Every call succeeds
    #[default]
    Success,
    /// Clone calls fail as if the provider rejected the sample
    CloneFails,
    /// Synthesis calls fail, cloning still works
    SynthesisFails,
    /// Tuning calls fail
    TuneFails,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Clone {
        name: String,
        description: String,
        sample_path: PathBuf,
    },
    Synthesize {
        voice_id: String,
        text: String,
    },
    Tune {
        voice_id: String,
        settings: VoiceSettings,
    },
}

#[derive(Default)]
struct MockState {
    behavior: MockBehavior,
    calls: Vec<MockCall>,
    scripted_voice_ids: VecDeque<String>,
    next_voice: usize,
}

/// In-process provider for tests and offline runs.
///
/// Clones share state, so a test can keep a handle while the workflow owns
/// another.
#[derive(Clone, Default)]
pub struct MockVoiceProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockVoiceProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        let provider = Self::default();
        provider.set_behavior(behavior);
        provider
    }

    pub fn set_behavior(&self, behavior: MockBehavior) {
        self.state.lock().unwrap().behavior = behavior;
    }

    /// The next clone call returns `voice_id` instead of a generated id.
    pub fn push_voice_id(&self, voice_id: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .scripted_voice_ids
            .push_back(voice_id.into());
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clone_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Clone { .. }))
    }

    pub fn synthesize_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Synthesize { .. }))
    }

    pub fn tune_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Tune { .. }))
    }

    fn count(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| predicate(c))
            .count()
    }

    /// Audio the mock returns for a synthesis call
    pub fn audio_for(voice_id: &str, text: &str) -> Vec<u8> {
        format!("mock-audio:{voice_id}:{text}").into_bytes()
    }
}

#[async_trait]
impl VoiceProvider for MockVoiceProvider {
    async fn clone_voice(
        &self,
        name: &str,
        description: &str,
        sample_path: &Path,
    ) -> Result<String> {
        // The real provider uploads the file, so a missing sample must fail here too.
        let exists = tokio::fs::try_exists(sample_path).await.unwrap_or(false);

        let mut state = self.state.lock().unwrap();
        state.calls.push(MockCall::Clone {
            name: name.to_string(),
            description: description.to_string(),
            sample_path: sample_path.to_path_buf(),
        });

        if !exists {
            anyhow::bail!("Mock provider could not open sample {sample_path:?}");
        }
        if state.behavior == MockBehavior::CloneFails {
            anyhow::bail!("Mock provider error 400: voice clone rejected");
        }

        if let Some(voice_id) = state.scripted_voice_ids.pop_front() {
            return Ok(voice_id);
        }
        state.next_voice += 1;
        Ok(format!("mock-voice-{}", state.next_voice))
    }

    async fn synthesize(&self, voice_id: &str, text: &str) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(MockCall::Synthesize {
            voice_id: voice_id.to_string(),
            text: text.to_string(),
        });

        if state.behavior == MockBehavior::SynthesisFails {
            anyhow::bail!("Mock provider error 500: synthesis unavailable");
        }
        Ok(Self::audio_for(voice_id, text))
    }

    async fn tune_settings(&self, voice_id: &str, settings: VoiceSettings) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(MockCall::Tune {
            voice_id: voice_id.to_string(),
            settings,
        });

        if state.behavior == MockBehavior::TuneFails {
            anyhow::bail!("Mock provider error 422: settings rejected");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_clone_uses_scripted_ids_then_generated() {
        let dir = tempdir().unwrap();
        let sample = dir.path().join("sample.wav");
        std::fs::write(&sample, b"RIFF").unwrap();

        let provider = MockVoiceProvider::new(MockBehavior::Success);
        provider.push_voice_id("v123");

        assert_eq!(provider.clone_voice("a", "", &sample).await.unwrap(), "v123");
        assert_eq!(
            provider.clone_voice("b", "", &sample).await.unwrap(),
            "mock-voice-1"
        );
        assert_eq!(provider.clone_count(), 2);
    }

    #[tokio::test]
    async fn test_clone_missing_sample_fails() {
        let provider = MockVoiceProvider::new(MockBehavior::Success);
        let result = provider
            .clone_voice("a", "", Path::new("/nonexistent/sample.wav"))
            .await;
        assert!(result.is_err());
        assert_eq!(provider.clone_count(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_failure_is_recorded() {
        let provider = MockVoiceProvider::new(MockBehavior::SynthesisFails);
        assert!(provider.synthesize("v1", "hi").await.is_err());
        assert_eq!(
            provider.calls(),
            vec![MockCall::Synthesize {
                voice_id: "v1".to_string(),
                text: "hi".to_string()
            }]
        );
    }

    #[test]
    fn test_behavior_deserializes_snake_case() {
        let behavior: MockBehavior = serde_json::from_str("\"synthesis_fails\"").unwrap();
        assert_eq!(behavior, MockBehavior::SynthesisFails);
    }
}
