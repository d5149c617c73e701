use crate::provider::mock::MockBehavior;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum accepted size of a multipart upload, in bytes
    #[serde(default = "default_upload_limit")]
    pub upload_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_origins: default_cors_origins(),
            upload_limit_bytes: default_upload_limit(),
        }
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3008".to_string(),
        "http://127.0.0.1:3008".to_string(),
        "null".to_string(),
    ]
}

fn default_upload_limit() -> usize {
    64 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VoiceProviderConfig {
    #[serde(rename = "elevenlabs")]
    ElevenLabs {
        #[serde(default)]
        api_key: String,
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_model_id")]
        model_id: String,
        #[serde(default = "default_stability")]
        stability: f32,
        #[serde(default = "default_similarity_boost")]
        similarity_boost: f32,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    #[serde(rename = "mock")]
    Mock {
        #[serde(default)]
        behavior: MockBehavior,
    },
}

impl Default for VoiceProviderConfig {
    fn default() -> Self {
        Self::ElevenLabs {
            api_key: String::new(),
            base_url: default_base_url(),
            model_id: default_model_id(),
            stability: default_stability(),
            similarity_boost: default_similarity_boost(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_ELEVENLABS_BASE_URL.to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_stability() -> f32 {
    0.6
}

fn default_similarity_boost() -> f32 {
    0.85
}

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StorageConfig {
    #[serde(rename = "s3")]
    S3 {
        #[serde(default)]
        bucket: String,
        #[serde(default)]
        region: String,
        #[serde(default)]
        profile: Option<String>,
    },
    /// Keeps objects in process memory. URLs keep the S3 shape.
    #[serde(rename = "memory")]
    Memory {
        #[serde(default = "default_memory_bucket")]
        bucket: String,
        #[serde(default = "default_memory_region")]
        region: String,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::S3 {
            bucket: String::new(),
            region: String::new(),
            profile: None,
        }
    }
}

fn default_memory_bucket() -> String {
    "local".to_string()
}

fn default_memory_region() -> String {
    "us-east-1".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DatabaseConfig {
    #[serde(rename = "postgres")]
    Postgres {
        #[serde(default)]
        url: String,
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
    #[serde(rename = "memory")]
    Memory,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::Postgres {
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    /// Cloning and synthesis provider
    #[serde(default)]
    pub provider: VoiceProviderConfig,

    /// Where samples and generated speech are archived
    #[serde(default)]
    pub storage: StorageConfig,

    /// Where voice and speech records are kept
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Settings {
    /// Fill secrets and deployment values from the environment. Environment
    /// values win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let VoiceProviderConfig::ElevenLabs { api_key, .. } = &mut self.provider {
            if let Some(value) = read("ELEVENLABS_API_KEY") {
                *api_key = value;
            }
        }

        if let StorageConfig::S3 {
            bucket,
            region,
            profile,
        } = &mut self.storage
        {
            if let Some(value) = read("AWS_S3_BUCKET_NAME") {
                *bucket = value;
            }
            if let Some(value) = read("AWS_REGION") {
                *region = value;
            }
            if let Some(value) = read("AWS_PROFILE") {
                *profile = Some(value);
            }
        }

        if let DatabaseConfig::Postgres { url, .. } = &mut self.database {
            if let Some(value) = read("DATABASE_URL") {
                *url = value;
            }
        }
    }

    /// Every value the selected backends need must be present.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut missing = Vec::new();

        if let VoiceProviderConfig::ElevenLabs {
            api_key,
            stability,
            similarity_boost,
            ..
        } = &self.provider
        {
            if api_key.is_empty() {
                missing.push("provider.api_key (ELEVENLABS_API_KEY)");
            }
            if !(0.0..=1.0).contains(stability) || !(0.0..=1.0).contains(similarity_boost) {
                anyhow::bail!("provider stability and similarity_boost must be within [0, 1]");
            }
        }

        if let StorageConfig::S3 { bucket, region, .. } = &self.storage {
            if bucket.is_empty() {
                missing.push("storage.bucket (AWS_S3_BUCKET_NAME)");
            }
            if region.is_empty() {
                missing.push("storage.region (AWS_REGION)");
            }
        }

        if let DatabaseConfig::Postgres { url, .. } = &self.database {
            if url.is_empty() {
                missing.push("database.url (DATABASE_URL)");
            }
        }

        if !missing.is_empty() {
            anyhow::bail!("missing required settings: {}", missing.join(", "));
        }
        Ok(())
    }
}
