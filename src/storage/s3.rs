/// AWS S3 and S3-compatible storage implementation

use super::ObjectStore;
use crate::core::config::StoreConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let (bucket, region, endpoint, access_key, secret_key) = match config {
            StoreConfig::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
            } => (
                bucket.clone(),
                region.clone(),
                endpoint.clone(),
                access_key_id.clone(),
                secret_access_key.clone(),
            ),
            _ => anyhow::bail!("Invalid config for S3Storage"),
        };

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .load()
            .await;

        let mut config_builder = aws_sdk_s3::config::Builder::from(&shared);

        // Use custom endpoint if provided (for S3-compatible services)
        if let Some(endpoint_url) = endpoint {
            config_builder = config_builder
                .endpoint_url(endpoint_url)
                .force_path_style(true);
        }

        // Static keys from config beat the environment, which beats the default chain
        let static_keys = match (access_key, secret_key) {
            (Some(access), Some(secret)) => Some((access, secret, None)),
            _ => match (
                std::env::var("AWS_ACCESS_KEY_ID"),
                std::env::var("AWS_SECRET_ACCESS_KEY"),
            ) {
                (Ok(access), Ok(secret)) => {
                    Some((access, secret, std::env::var("AWS_SESSION_TOKEN").ok()))
                }
                _ => None,
            },
        };

        if let Some((access, secret, token)) = static_keys {
            let creds = Credentials::new(access, secret, token, None, "topic-archiver");
            config_builder = config_builder.credentials_provider(creds);
        }

        let client = Client::from_conf(config_builder.build());

        Ok(Self { client, bucket })
    }
}

#[async_trait]
impl ObjectStore for S3Storage {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body))
            .send()
            .await
            .with_context(|| format!("Failed to upload to {}", self.location(key)))?;

        Ok(())
    }

    async fn verify_access(&self) -> Result<()> {
        // Try to list objects with max-keys=1 to verify access
        self.client
            .list_objects_v2()
            .bucket(&self.bucket)
            .max_keys(1)
            .send()
            .await
            .context("Failed to verify S3 access")?;

        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key.trim_start_matches('/'))
    }
}
