use anyhow::Result;
use async_trait::async_trait;

use super::types::{NewSpeechRecord, NewVoiceRecord, SpeechRecord, VoiceRecord};

/// Durable home of voice and speech records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Open a session for one request. The session releases its resources
    /// when dropped, whatever path the request took.
    async fn open_session(&self) -> Result<Box<dyn RecordSession>>;
}

/// One request's view of the record store.
///
/// Inserts are committed before they return and come back with their
/// store-assigned id. Uniqueness of `voice_id`, `sample_s3_url` and `s3_url`
/// is enforced by the store.
#[async_trait]
pub trait RecordSession: Send {
    async fn insert_voice(&mut self, record: NewVoiceRecord) -> Result<VoiceRecord>;

    async fn insert_speech(&mut self, record: NewSpeechRecord) -> Result<SpeechRecord>;

    /// Look a voice up by its provider voice id
    async fn find_voice(&mut self, voice_id: &str) -> Result<Option<VoiceRecord>>;

    async fn list_voices(&mut self) -> Result<Vec<VoiceRecord>>;
}
