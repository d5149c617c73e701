use anyhow::Result;
use async_trait::async_trait;

/// Object storage that hands back a public URL for everything it stores.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the object's public URL
    async fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String>;
}
