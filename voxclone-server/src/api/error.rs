use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use voxclone_core::workflow::{ErrorKind, WorkflowError};

/// A failed request. The body is always `{"detail": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map a workflow failure. Server-side failures get `summary` plus the
    /// failed stage; the full cause only goes to the log.
    pub fn from_workflow(err: WorkflowError, summary: &str) -> Self {
        match (&err, err.kind()) {
            (WorkflowError::VoiceNotFound(_), _) => Self::NotFound(err.to_string()),
            (WorkflowError::InvalidSettings(_), _) => Self::Unprocessable(err.to_string()),
            (WorkflowError::SampleUnreadable { .. }, _) => {
                tracing::warn!("{summary}: {err}");
                Self::BadRequest("The uploaded voice sample could not be read.".to_string())
            }
            (_, ErrorKind::Input) => Self::BadRequest(err.to_string()),
            (_, ErrorKind::ExternalService | ErrorKind::Persistence) => {
                tracing::error!(stage = %err.stage(), "{summary}: {err}");
                Self::Internal(format!("{summary} ({} failed).", err.stage()))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Unprocessable(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxclone_core::workflow::Stage;

    #[test]
    fn test_not_found_keeps_voice_id() {
        let err = ApiError::from_workflow(WorkflowError::VoiceNotFound("v1".into()), "x");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Voice with ID 'v1' not found.");
    }

    #[test]
    fn test_unreadable_sample_hides_local_path() {
        let err = ApiError::from_workflow(
            WorkflowError::SampleUnreadable {
                path: "/tmp/voxclone-sample-abc/sample.wav".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            "x",
        );
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "The uploaded voice sample could not be read."
        );
    }

    #[test]
    fn test_stage_failure_hides_provider_body() {
        let cause = anyhow::anyhow!("ElevenLabs API error 401: {{\"detail\":\"invalid key\"}}");
        let err = ApiError::from_workflow(
            WorkflowError::ExternalService {
                stage: Stage::CloneVoice,
                cause,
            },
            "Failed to complete the voice processing workflow",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Failed to complete the voice processing workflow (voice cloning failed)."
        );
    }

    #[test]
    fn test_invalid_settings_is_unprocessable() {
        let err = ApiError::from_workflow(WorkflowError::InvalidSettings("bad".into()), "x");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
