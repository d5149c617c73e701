pub mod provider;
pub mod records;
pub mod services;
pub mod settings;
pub mod storage;
pub mod workflow;

pub use provider::VoiceProvider;
pub use records::{RecordSession, RecordStore, SpeechRecord, VoiceRecord};
pub use services::Services;
pub use settings::Settings;
pub use storage::ObjectStore;
pub use workflow::{CloneAndSpeakRequest, VoiceWorkflow, WorkflowError};
