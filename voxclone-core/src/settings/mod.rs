pub mod config;
pub mod loader;

pub use config::{DatabaseConfig, Settings, StorageConfig, VoiceProviderConfig};
pub use loader::load_settings;
