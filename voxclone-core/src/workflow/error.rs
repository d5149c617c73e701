use std::path::PathBuf;

use thiserror::Error;

/// Pipeline step in which a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Stage {
    #[strum(to_string = "reading the voice sample")]
    ReadSample,
    #[strum(to_string = "archiving the voice sample")]
    ArchiveSample,
    #[strum(to_string = "voice cloning")]
    CloneVoice,
    #[strum(to_string = "saving the voice record")]
    PersistVoice,
    #[strum(to_string = "looking up the voice")]
    LookupVoice,
    #[strum(to_string = "listing voices")]
    ListVoices,
    #[strum(to_string = "speech synthesis")]
    Synthesize,
    #[strum(to_string = "archiving generated speech")]
    ArchiveSpeech,
    #[strum(to_string = "saving the speech record")]
    PersistSpeech,
    #[strum(to_string = "checking voice settings")]
    CheckSettings,
}

/// Coarse class of a [`WorkflowError`], used by callers to pick a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied something unusable
    Input,
    /// The provider or object storage reported a failure
    ExternalService,
    /// The record store failed
    Persistence,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Failed to read voice sample {path:?}: {source}")]
    SampleUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Voice with ID '{0}' not found.")]
    VoiceNotFound(String),

    #[error("Invalid voice settings: {0}")]
    InvalidSettings(String),

    #[error("{stage} failed: {cause:#}")]
    ExternalService { stage: Stage, cause: anyhow::Error },

    #[error("{stage} failed: {cause:#}")]
    Persistence { stage: Stage, cause: anyhow::Error },
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SampleUnreadable { .. } | Self::VoiceNotFound(_) | Self::InvalidSettings(_) => {
                ErrorKind::Input
            }
            Self::ExternalService { .. } => ErrorKind::ExternalService,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::SampleUnreadable { .. } => Stage::ReadSample,
            Self::VoiceNotFound(_) => Stage::LookupVoice,
            Self::InvalidSettings(_) => Stage::CheckSettings,
            Self::ExternalService { stage, .. } | Self::Persistence { stage, .. } => *stage,
        }
    }

    pub(crate) fn external(stage: Stage) -> impl FnOnce(anyhow::Error) -> Self {
        move |cause| Self::ExternalService { stage, cause }
    }

    pub(crate) fn persistence(stage: Stage) -> impl FnOnce(anyhow::Error) -> Self {
        move |cause| Self::Persistence { stage, cause }
    }
}
