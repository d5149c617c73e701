//! PostgreSQL record store

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgPool, Postgres};

use super::store::{RecordSession, RecordStore};
use super::types::{NewSpeechRecord, NewVoiceRecord, SpeechRecord, VoiceRecord};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS cloned_voices (
    id BIGSERIAL PRIMARY KEY,
    voice_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT,
    sample_s3_url TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ DEFAULT now()
);
CREATE INDEX IF NOT EXISTS ix_cloned_voices_voice_id ON cloned_voices (voice_id);
CREATE TABLE IF NOT EXISTS generated_speech (
    id BIGSERIAL PRIMARY KEY,
    text_content TEXT,
    s3_url TEXT NOT NULL UNIQUE,
    created_at TIMESTAMPTZ DEFAULT now(),
    cloned_voice_id BIGINT REFERENCES cloned_voices (id)
);
"#;

const DROP_SCHEMA: &str = "DROP TABLE IF EXISTS generated_speech, cloned_voices;";

#[derive(Clone)]
pub struct PostgresRecordStore {
    pool: PgPool,
}

impl PostgresRecordStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create both tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to create schema")?;
        Ok(())
    }

    /// Drop both tables and everything in them
    pub async fn reset(&self) -> Result<()> {
        let mut tx = self.pool.begin().await.context("Failed to begin reset")?;
        sqlx::raw_sql(DROP_SCHEMA)
            .execute(&mut *tx)
            .await
            .context("Failed to drop tables")?;
        tx.commit().await.context("Failed to commit reset")?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresRecordStore {
    async fn open_session(&self) -> Result<Box<dyn RecordSession>> {
        let conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire database connection")?;
        Ok(Box::new(PostgresSession { conn }))
    }
}

/// Holds one pooled connection for the lifetime of a request. The connection
/// goes back to the pool on drop.
pub struct PostgresSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl RecordSession for PostgresSession {
    async fn insert_voice(&mut self, record: NewVoiceRecord) -> Result<VoiceRecord> {
        let mut tx = self.conn.begin().await.context("Failed to begin transaction")?;

        let inserted = sqlx::query_as::<_, VoiceRecord>(
            "INSERT INTO cloned_voices (voice_id, name, description, sample_s3_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, voice_id, name, description, sample_s3_url, created_at",
        )
        .bind(&record.voice_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.sample_s3_url)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert voice {}", record.voice_id))?;

        tx.commit().await.context("Failed to commit voice record")?;
        Ok(inserted)
    }

    async fn insert_speech(&mut self, record: NewSpeechRecord) -> Result<SpeechRecord> {
        let mut tx = self.conn.begin().await.context("Failed to begin transaction")?;

        let inserted = sqlx::query_as::<_, SpeechRecord>(
            "INSERT INTO generated_speech (text_content, s3_url, cloned_voice_id) \
             VALUES ($1, $2, $3) \
             RETURNING id, text_content, s3_url, cloned_voice_id, created_at",
        )
        .bind(&record.text_content)
        .bind(&record.s3_url)
        .bind(record.cloned_voice_id)
        .fetch_one(&mut *tx)
        .await
        .with_context(|| format!("Failed to insert speech record {}", record.s3_url))?;

        tx.commit().await.context("Failed to commit speech record")?;
        Ok(inserted)
    }

    async fn find_voice(&mut self, voice_id: &str) -> Result<Option<VoiceRecord>> {
        sqlx::query_as::<_, VoiceRecord>(
            "SELECT id, voice_id, name, description, sample_s3_url, created_at \
             FROM cloned_voices WHERE voice_id = $1 LIMIT 1",
        )
        .bind(voice_id)
        .fetch_optional(&mut *self.conn)
        .await
        .with_context(|| format!("Failed to look up voice {voice_id}"))
    }

    async fn list_voices(&mut self) -> Result<Vec<VoiceRecord>> {
        sqlx::query_as::<_, VoiceRecord>(
            "SELECT id, voice_id, name, description, sample_s3_url, created_at \
             FROM cloned_voices ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await
        .context("Failed to list voices")
    }
}
