use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use tracing::info;
use voxclone_core::provider::VoiceSettings;
use voxclone_core::CloneAndSpeakRequest;

use super::error::ApiError;
use super::schemas::{
    CloneAndSpeakResponse, MessageResponse, SpeakRequest, SpeakResponse, TuneSettingsResponse,
    VoiceResponse,
};
use super::upload::CloneAndSpeakForm;
use super::AppState;

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the VoxClone voice cloning API.".to_string(),
    })
}

pub async fn list_voices(
    State(state): State<AppState>,
) -> Result<Json<Vec<VoiceResponse>>, ApiError> {
    let mut session = state.session().await?;
    let voices = state
        .services
        .workflow
        .list_voices(session.as_mut())
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to list voices"))?;

    Ok(Json(voices.into_iter().map(VoiceResponse::from).collect()))
}

pub async fn speak(
    State(state): State<AppState>,
    payload: Result<Json<SpeakRequest>, JsonRejection>,
) -> Result<Json<SpeakResponse>, ApiError> {
    let Json(payload) = payload?;
    info!(voice_id = %payload.voice_id, "Generating speech for existing voice");
    let mut session = state.session().await?;

    let speech = state
        .services
        .workflow
        .speak(session.as_mut(), &payload.voice_id, &payload.text)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to generate speech"))?;

    Ok(Json(SpeakResponse {
        message: "Speech generated successfully.".to_string(),
        generated_speech_s3_url: speech.s3_url,
        record_id: speech.id,
    }))
}

pub async fn clone_and_speak(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CloneAndSpeakResponse>, ApiError> {
    // The form owns the temporary sample; it is deleted when `form` drops,
    // whichever way this handler exits.
    let form = CloneAndSpeakForm::from_multipart(multipart).await?;
    let request = CloneAndSpeakRequest {
        sample_path: form.sample.path(),
        original_filename: form.sample.file_name().to_string(),
        voice_name: form.voice_name.clone(),
        voice_description: form.voice_description.clone(),
        text: form.text_to_speak.clone(),
    };

    let mut session = state.session().await?;
    let (voice, speech) = state
        .services
        .workflow
        .clone_and_speak(session.as_mut(), &request)
        .await
        .map_err(|e| {
            ApiError::from_workflow(e, "Failed to complete the voice processing workflow")
        })?;

    Ok(Json(CloneAndSpeakResponse {
        message: "Voice processed successfully.".to_string(),
        cloned_voice_record_id: voice.id,
        generated_speech_record_id: speech.id,
        elevenlabs_voice_id: voice.voice_id,
        voice_sample_s3_url: voice.sample_s3_url,
        generated_speech_s3_url: speech.s3_url,
    }))
}

pub async fn tune(
    State(state): State<AppState>,
    Path(voice_id): Path<String>,
    settings: Result<Json<VoiceSettings>, JsonRejection>,
) -> Result<Json<TuneSettingsResponse>, ApiError> {
    let Json(settings) = settings?;
    let applied = state
        .services
        .workflow
        .tune(&voice_id, settings)
        .await
        .map_err(|e| ApiError::from_workflow(e, "Failed to tune voice"))?;

    Ok(Json(TuneSettingsResponse {
        message: format!("Settings for voice {voice_id} updated."),
        voice_id,
        settings: applied,
    }))
}
