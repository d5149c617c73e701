use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use super::keys::public_url;
use super::provider::ObjectStore;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
struct MemoryState {
    objects: HashMap<String, StoredObject>,
    uploads: usize,
    fail_uploads: bool,
}

/// Object store backed by a map. URLs use the same shape as S3 so records
/// written against it look like production records.
#[derive(Clone)]
pub struct MemoryObjectStore {
    bucket: String,
    region: String,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Make every later upload fail, or succeed again
    pub fn set_fail_uploads(&self, fail: bool) {
        self.state.lock().unwrap().fail_uploads = fail;
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.lock().unwrap().objects.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Upload attempts, including failed ones
    pub fn upload_count(&self) -> usize {
        self.state.lock().unwrap().uploads
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.uploads += 1;
        if state.fail_uploads {
            anyhow::bail!("Memory store rejected upload of {key}");
        }

        state.objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: super::AUDIO_CONTENT_TYPE.to_string(),
            },
        );
        Ok(public_url(&self.bucket, &self.region, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_returns_public_url_and_keeps_bytes() {
        let store = MemoryObjectStore::new("bucket", "eu-west-1");
        let url = store
            .upload(b"abc".to_vec(), "speech-outputs/v1/x.mp3")
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://bucket.s3.eu-west-1.amazonaws.com/speech-outputs/v1/x.mp3"
        );
        let object = store.get("speech-outputs/v1/x.mp3").unwrap();
        assert_eq!(object.bytes, b"abc");
        assert_eq!(object.content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_failing_upload_stores_nothing() {
        let store = MemoryObjectStore::new("bucket", "region");
        store.set_fail_uploads(true);
        assert!(store.upload(b"abc".to_vec(), "k").await.is_err());
        assert!(store.keys().is_empty());
        assert_eq!(store.upload_count(), 1);
    }
}
