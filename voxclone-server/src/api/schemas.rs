use serde::{Deserialize, Serialize};
use voxclone_core::provider::VoiceSettings;
use voxclone_core::VoiceRecord;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceResponse {
    pub id: i64,
    pub voice_id: String,
    pub name: String,
    pub sample_s3_url: String,
}

impl From<VoiceRecord> for VoiceResponse {
    fn from(record: VoiceRecord) -> Self {
        Self {
            id: record.id,
            voice_id: record.voice_id,
            name: record.name,
            sample_s3_url: record.sample_s3_url,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakRequest {
    pub voice_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakResponse {
    pub message: String,
    pub generated_speech_s3_url: String,
    pub record_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TuneSettingsResponse {
    pub message: String,
    pub voice_id: String,
    pub settings: VoiceSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CloneAndSpeakResponse {
    pub message: String,
    pub cloned_voice_record_id: i64,
    pub generated_speech_record_id: i64,
    pub elevenlabs_voice_id: String,
    pub voice_sample_s3_url: String,
    pub generated_speech_s3_url: String,
}
