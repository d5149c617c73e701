//! The voice processing pipeline.
//!
//! Every step must succeed before the next one starts. A failure stops the
//! pipeline where it is: nothing already uploaded, cloned or committed is
//! undone, and nothing is retried.

pub mod error;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::provider::{VoiceProvider, VoiceSettings};
use crate::records::{NewSpeechRecord, NewVoiceRecord, RecordSession, SpeechRecord, VoiceRecord};
use crate::storage::{sample_key, speech_key, ObjectStore};

pub use error::{ErrorKind, Stage, WorkflowError};

/// Inputs of a full clone-and-speak run
#[derive(Debug, Clone)]
pub struct CloneAndSpeakRequest {
    /// Local copy of the uploaded sample. The caller owns and removes it.
    pub sample_path: PathBuf,
    /// File name the sample was uploaded with
    pub original_filename: String,
    pub voice_name: String,
    pub voice_description: String,
    pub text: String,
}

/// Runs the pipeline against injected clients. Cheap to clone and safe to
/// share between concurrent requests; per-request state lives in the
/// [`RecordSession`] passed to each call.
#[derive(Clone)]
pub struct VoiceWorkflow {
    provider: Arc<dyn VoiceProvider>,
    storage: Arc<dyn ObjectStore>,
}

impl VoiceWorkflow {
    pub fn new(provider: Arc<dyn VoiceProvider>, storage: Arc<dyn ObjectStore>) -> Self {
        Self { provider, storage }
    }

    /// Archive the sample, clone a voice from it, save the voice, then speak
    /// `text` with it and save the result.
    pub async fn clone_and_speak(
        &self,
        session: &mut dyn RecordSession,
        request: &CloneAndSpeakRequest,
    ) -> Result<(VoiceRecord, SpeechRecord), WorkflowError> {
        info!(
            "Uploading voice sample '{}' to storage",
            request.original_filename
        );
        let sample = tokio::fs::read(&request.sample_path)
            .await
            .map_err(|source| WorkflowError::SampleUnreadable {
                path: request.sample_path.clone(),
                source,
            })?;

        let key = sample_key(Uuid::new_v4(), &request.original_filename);
        let sample_s3_url = self
            .storage
            .upload(sample, &key)
            .await
            .map_err(WorkflowError::external(Stage::ArchiveSample))
            .inspect_err(|e| warn!("Failed to upload voice sample: {e}"))?;

        info!("Cloning voice '{}' using the sample", request.voice_name);
        let voice_id = self
            .provider
            .clone_voice(
                &request.voice_name,
                &request.voice_description,
                &request.sample_path,
            )
            .await
            .map_err(WorkflowError::external(Stage::CloneVoice))
            .inspect_err(|e| warn!("Failed to clone voice: {e}"))?;

        let voice = session
            .insert_voice(NewVoiceRecord {
                voice_id,
                name: request.voice_name.clone(),
                description: Some(request.voice_description.clone()),
                sample_s3_url,
            })
            .await
            .map_err(WorkflowError::persistence(Stage::PersistVoice))
            .inspect_err(|e| warn!("Failed to store cloned voice: {e}"))?;
        info!(
            record_id = voice.id,
            voice_id = %voice.voice_id,
            "Stored cloned voice record"
        );

        let speech = self.generate(session, &voice, &request.text).await?;
        Ok((voice, speech))
    }

    /// Speak `text` with a voice cloned earlier.
    pub async fn speak(
        &self,
        session: &mut dyn RecordSession,
        voice_id: &str,
        text: &str,
    ) -> Result<SpeechRecord, WorkflowError> {
        let voice = session
            .find_voice(voice_id)
            .await
            .map_err(WorkflowError::persistence(Stage::LookupVoice))?
            .ok_or_else(|| WorkflowError::VoiceNotFound(voice_id.to_string()))?;

        self.generate(session, &voice, text).await
    }

    pub async fn list_voices(
        &self,
        session: &mut dyn RecordSession,
    ) -> Result<Vec<VoiceRecord>, WorkflowError> {
        session
            .list_voices()
            .await
            .map_err(WorkflowError::persistence(Stage::ListVoices))
    }

    /// Forward new settings to the provider. Nothing is stored locally and
    /// later synthesis keeps using the configured defaults.
    ///
    /// A provider rejection is logged and the requested settings are still
    /// echoed back; only out-of-range values fail the call.
    pub async fn tune(
        &self,
        voice_id: &str,
        settings: VoiceSettings,
    ) -> Result<VoiceSettings, WorkflowError> {
        if let Some(problem) = settings.out_of_range() {
            return Err(WorkflowError::InvalidSettings(problem));
        }

        match self.provider.tune_settings(voice_id, settings).await {
            Ok(()) => info!(
                voice_id,
                stability = settings.stability,
                similarity_boost = settings.similarity_boost,
                "Tuned voice settings"
            ),
            Err(e) => warn!("Failed to update settings for voice {voice_id}: {e:#}"),
        }
        Ok(settings)
    }

    /// Synthesize, archive and record speech for an existing voice
    async fn generate(
        &self,
        session: &mut dyn RecordSession,
        voice: &VoiceRecord,
        text: &str,
    ) -> Result<SpeechRecord, WorkflowError> {
        let preview: String = text.chars().take(40).collect();
        info!("Generating speech for text: '{preview}...'");

        let audio = self
            .provider
            .synthesize(&voice.voice_id, text)
            .await
            .map_err(WorkflowError::external(Stage::Synthesize))
            .inspect_err(|e| warn!("Failed to generate speech audio: {e}"))?;

        let key = speech_key(&voice.voice_id, Uuid::new_v4());
        let s3_url = self
            .storage
            .upload(audio, &key)
            .await
            .map_err(WorkflowError::external(Stage::ArchiveSpeech))
            .inspect_err(|e| warn!("Failed to upload generated speech: {e}"))?;

        let speech = session
            .insert_speech(NewSpeechRecord {
                text_content: text.to_string(),
                s3_url,
                cloned_voice_id: voice.id,
            })
            .await
            .map_err(WorkflowError::persistence(Stage::PersistSpeech))
            .inspect_err(|e| warn!("Failed to store generated speech: {e}"))?;
        info!(record_id = speech.id, "Stored generated speech record");

        Ok(speech)
    }
}
