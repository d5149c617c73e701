//! Construction of the long-lived clients from settings.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::provider::{ElevenLabs, ElevenLabsConfig, MockVoiceProvider, VoiceProvider, VoiceSettings};
use crate::records::{MemoryRecordStore, PostgresRecordStore, RecordStore};
use crate::settings::{DatabaseConfig, Settings, StorageConfig, VoiceProviderConfig};
use crate::storage::{MemoryObjectStore, ObjectStore, S3ObjectStore, S3StoreConfig};
use crate::workflow::VoiceWorkflow;

/// Everything a request needs, built once at startup and shared.
#[derive(Clone)]
pub struct Services {
    pub workflow: VoiceWorkflow,
    pub records: Arc<dyn RecordStore>,
}

impl Services {
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let provider = build_provider(&settings.provider)?;
        let storage = build_storage(&settings.storage).await?;
        let records = build_record_store(&settings.database).await?;

        Ok(Self {
            workflow: VoiceWorkflow::new(provider, storage),
            records,
        })
    }
}

pub fn build_provider(config: &VoiceProviderConfig) -> Result<Arc<dyn VoiceProvider>> {
    match config {
        VoiceProviderConfig::ElevenLabs {
            api_key,
            base_url,
            model_id,
            stability,
            similarity_boost,
            timeout_secs,
        } => {
            info!(%base_url, %model_id, "Using ElevenLabs voice provider");
            let client = ElevenLabs::new(ElevenLabsConfig {
                api_key: api_key.clone(),
                base_url: base_url.clone(),
                model_id: model_id.clone(),
                synthesis_settings: VoiceSettings::new(*stability, *similarity_boost),
                timeout: Duration::from_secs(*timeout_secs),
            })?;
            Ok(Arc::new(client))
        }
        VoiceProviderConfig::Mock { behavior } => {
            info!(?behavior, "Using mock voice provider");
            Ok(Arc::new(MockVoiceProvider::new(behavior.clone())))
        }
    }
}

pub async fn build_storage(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config {
        StorageConfig::S3 {
            bucket,
            region,
            profile,
        } => {
            info!(%bucket, %region, "Using S3 object storage");
            let store = S3ObjectStore::new(S3StoreConfig {
                bucket: bucket.clone(),
                region: region.clone(),
                profile: profile.clone(),
            })
            .await?;
            Ok(Arc::new(store))
        }
        StorageConfig::Memory { bucket, region } => {
            info!(%bucket, %region, "Using in-memory object storage");
            Ok(Arc::new(MemoryObjectStore::new(bucket.clone(), region.clone())))
        }
    }
}

pub async fn build_record_store(config: &DatabaseConfig) -> Result<Arc<dyn RecordStore>> {
    match config {
        DatabaseConfig::Postgres {
            url,
            max_connections,
        } => {
            let store = PostgresRecordStore::connect(url, *max_connections).await?;
            store.ensure_schema().await?;
            info!("Connected to PostgreSQL record store");
            Ok(Arc::new(store))
        }
        DatabaseConfig::Memory => {
            info!("Using in-memory record store");
            Ok(Arc::new(MemoryRecordStore::new()))
        }
    }
}
