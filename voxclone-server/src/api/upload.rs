//! Reading the clone-and-speak multipart form.

use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, Multipart};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;

use super::error::ApiError;

/// An uploaded sample on local disk. The directory holding it is removed
/// when this value is dropped.
pub struct UploadedSample {
    dir: TempDir,
    file_name: String,
}

impl UploadedSample {
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(&self.file_name)
    }

    /// Name the client uploaded the file with, reduced to its last component
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

pub struct CloneAndSpeakForm {
    pub voice_name: String,
    pub text_to_speak: String,
    pub voice_description: String,
    pub sample: UploadedSample,
}

impl CloneAndSpeakForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut voice_name = None;
        let mut text_to_speak = None;
        let mut voice_description = None;
        let mut sample = None;

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "voice_name" => voice_name = Some(field.text().await.map_err(bad_form)?),
                "text_to_speak" => text_to_speak = Some(field.text().await.map_err(bad_form)?),
                "voice_description" => {
                    voice_description = Some(field.text().await.map_err(bad_form)?)
                }
                "file" => sample = Some(save_sample(field).await?),
                other => tracing::debug!("Ignoring unexpected form field {other:?}"),
            }
        }

        Ok(Self {
            voice_name: voice_name.ok_or_else(|| missing("voice_name"))?,
            text_to_speak: text_to_speak.ok_or_else(|| missing("text_to_speak"))?,
            voice_description: voice_description.unwrap_or_default(),
            sample: sample.ok_or_else(|| missing("file"))?,
        })
    }
}

async fn save_sample(mut field: Field<'_>) -> Result<UploadedSample, ApiError> {
    let file_name = sanitize_file_name(field.file_name().unwrap_or_default());

    let dir = tempfile::Builder::new()
        .prefix("voxclone-sample-")
        .tempdir()
        .map_err(|e| internal_io("create upload directory", e))?;

    let mut file = tokio::fs::File::create(dir.path().join(&file_name))
        .await
        .map_err(|e| internal_io("create upload file", e))?;

    while let Some(chunk) = field.chunk().await.map_err(bad_form)? {
        file.write_all(&chunk)
            .await
            .map_err(|e| internal_io("write upload file", e))?;
    }
    file.flush()
        .await
        .map_err(|e| internal_io("flush upload file", e))?;

    Ok(UploadedSample { dir, file_name })
}

/// Keep only the final path component so the sample stays inside its
/// directory. Falls back to `sample` when nothing usable remains.
pub fn sanitize_file_name(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    match Path::new(last).file_name().and_then(|n| n.to_str()) {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => "sample".to_string(),
    }
}

fn bad_form(err: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::BadRequest(format!("Invalid multipart form: {}", err.body_text()))
}

fn missing(field: &str) -> ApiError {
    ApiError::Unprocessable(format!("Missing required form field '{field}'."))
}

fn internal_io(action: &str, err: std::io::Error) -> ApiError {
    tracing::error!(error = %err, "Failed to {action}");
    ApiError::Internal("Failed to store the uploaded sample.".to_string())
}
