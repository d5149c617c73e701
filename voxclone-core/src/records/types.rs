use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cloned voice as stored in `cloned_voices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoiceRecord {
    pub id: i64,
    /// Identifier assigned by the cloning provider
    pub voice_id: String,
    pub name: String,
    pub description: Option<String>,
    pub sample_s3_url: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Generated speech as stored in `generated_speech`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SpeechRecord {
    pub id: i64,
    pub text_content: Option<String>,
    pub s3_url: String,
    /// `VoiceRecord::id` of the voice that spoke this text
    pub cloned_voice_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVoiceRecord {
    pub voice_id: String,
    pub name: String,
    pub description: Option<String>,
    pub sample_s3_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSpeechRecord {
    pub text_content: String,
    pub s3_url: String,
    pub cloned_voice_id: i64,
}
