use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;

use super::store::{RecordSession, RecordStore};
use super::types::{NewSpeechRecord, NewVoiceRecord, SpeechRecord, VoiceRecord};

#[derive(Default)]
struct Tables {
    voices: Vec<VoiceRecord>,
    speech: Vec<SpeechRecord>,
    fail_writes: bool,
    fail_speech_writes: bool,
}

/// Record store kept in process memory. Enforces the same unique and
/// foreign-key constraints as the PostgreSQL schema.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later insert fail, as a lost database would
    pub fn set_fail_writes(&self, fail: bool) {
        self.tables.lock().unwrap().fail_writes = fail;
    }

    /// Make only speech inserts fail; voice inserts keep working
    pub fn set_fail_speech_writes(&self, fail: bool) {
        self.tables.lock().unwrap().fail_speech_writes = fail;
    }

    pub fn voices(&self) -> Vec<VoiceRecord> {
        self.tables.lock().unwrap().voices.clone()
    }

    pub fn speech(&self) -> Vec<SpeechRecord> {
        self.tables.lock().unwrap().speech.clone()
    }

    pub fn speech_for_voice(&self, voice_record_id: i64) -> Vec<SpeechRecord> {
        self.tables
            .lock()
            .unwrap()
            .speech
            .iter()
            .filter(|s| s.cloned_voice_id == Some(voice_record_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn open_session(&self) -> Result<Box<dyn RecordSession>> {
        Ok(Box::new(self.clone()))
    }
}

#[async_trait]
impl RecordSession for MemoryRecordStore {
    async fn insert_voice(&mut self, record: NewVoiceRecord) -> Result<VoiceRecord> {
        let mut tables = self.tables.lock().unwrap();
        if tables.fail_writes {
            anyhow::bail!("Memory store is refusing writes");
        }
        if tables.voices.iter().any(|v| v.voice_id == record.voice_id) {
            anyhow::bail!("duplicate key: voice_id {} already exists", record.voice_id);
        }
        if tables
            .voices
            .iter()
            .any(|v| v.sample_s3_url == record.sample_s3_url)
        {
            anyhow::bail!(
                "duplicate key: sample_s3_url {} already exists",
                record.sample_s3_url
            );
        }

        let inserted = VoiceRecord {
            id: tables.voices.len() as i64 + 1,
            voice_id: record.voice_id,
            name: record.name,
            description: record.description,
            sample_s3_url: record.sample_s3_url,
            created_at: Some(Utc::now()),
        };
        tables.voices.push(inserted.clone());
        Ok(inserted)
    }

    async fn insert_speech(&mut self, record: NewSpeechRecord) -> Result<SpeechRecord> {
        let mut tables = self.tables.lock().unwrap();
        if tables.fail_writes || tables.fail_speech_writes {
            anyhow::bail!("Memory store is refusing writes");
        }
        if !tables.voices.iter().any(|v| v.id == record.cloned_voice_id) {
            anyhow::bail!(
                "foreign key violation: cloned voice {} does not exist",
                record.cloned_voice_id
            );
        }
        if tables.speech.iter().any(|s| s.s3_url == record.s3_url) {
            anyhow::bail!("duplicate key: s3_url {} already exists", record.s3_url);
        }

        let inserted = SpeechRecord {
            id: tables.speech.len() as i64 + 1,
            text_content: Some(record.text_content),
            s3_url: record.s3_url,
            cloned_voice_id: Some(record.cloned_voice_id),
            created_at: Some(Utc::now()),
        };
        tables.speech.push(inserted.clone());
        Ok(inserted)
    }

    async fn find_voice(&mut self, voice_id: &str) -> Result<Option<VoiceRecord>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .voices
            .iter()
            .find(|v| v.voice_id == voice_id)
            .cloned())
    }

    async fn list_voices(&mut self) -> Result<Vec<VoiceRecord>> {
        Ok(self.voices())
    }
}
