pub mod keys;
pub mod memory;
pub mod provider;
pub mod s3;

pub use keys::{public_url, sample_key, speech_key};
pub use memory::MemoryObjectStore;
pub use provider::ObjectStore;
pub use s3::{S3ObjectStore, S3StoreConfig};

/// Content type every archived object is written with
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
