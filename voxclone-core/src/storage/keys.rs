//! Object key and URL conventions shared by every store. Existing objects
//! were written with these exact shapes, so they must not change.

use uuid::Uuid;

/// `voice-samples/{token}-{original_filename}`
pub fn sample_key(token: Uuid, original_filename: &str) -> String {
    format!("voice-samples/{token}-{original_filename}")
}

/// `speech-outputs/{voice_id}/{token}.mp3`
pub fn speech_key(voice_id: &str, token: Uuid) -> String {
    format!("speech-outputs/{voice_id}/{token}.mp3")
}

/// `https://{bucket}.s3.{region}.amazonaws.com/{key}`
pub fn public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}
