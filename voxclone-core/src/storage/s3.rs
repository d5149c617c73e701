//! Amazon S3 object store

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::keys::public_url;
use super::provider::ObjectStore;
use super::AUDIO_CONTENT_TYPE;

#[derive(Debug, Clone)]
pub struct S3StoreConfig {
    pub bucket: String,
    pub region: String,
    pub profile: Option<String>,
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    /// Build a client from the default AWS credential chain
    pub async fn new(config: S3StoreConfig) -> Result<Self> {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(profile) = &config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        aws_config_loader = aws_config_loader.region(Region::new(config.region.clone()));

        let aws_config = aws_config_loader.load().await;
        let client = Client::new(&aws_config);

        Ok(Self {
            client,
            bucket: config.bucket,
            region: config.region,
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(&self, bytes: Vec<u8>, key: &str) -> Result<String> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(AUDIO_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, bucket = %self.bucket, key, "S3 upload failed");
                e
            })
            .with_context(|| format!("Failed to upload {key} to bucket {}", self.bucket))?;

        let url = public_url(&self.bucket, &self.region, key);
        tracing::info!(size, %url, "Uploaded object to S3");
        Ok(url)
    }
}
