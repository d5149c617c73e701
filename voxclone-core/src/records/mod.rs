pub mod memory;
pub mod postgres;
pub mod store;
pub mod types;

pub use memory::MemoryRecordStore;
pub use postgres::PostgresRecordStore;
pub use store::{RecordSession, RecordStore};
pub use types::{NewSpeechRecord, NewVoiceRecord, SpeechRecord, VoiceRecord};
