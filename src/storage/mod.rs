//! Object store output for archived batches
//!
//! Every backend writes one body to one key, replacing whatever was there.
use crate::core::config::StoreConfig;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod local;
pub mod s3;

pub use local::LocalStorage;
pub use s3::S3Storage;

/// Common interface for object store backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write the body to `key`, overwriting any existing object
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;

    /// Check if the storage is accessible
    async fn verify_access(&self) -> Result<()>;

    /// Human readable address of `key`, e.g. s3://bucket/key
    fn location(&self, key: &str) -> String;
}

/// Factory for creating object store backends
pub async fn create_storage(config: &StoreConfig) -> Result<Box<dyn ObjectStore>> {
    match config {
        StoreConfig::S3 { .. } => Ok(Box::new(S3Storage::connect(config).await?)),
        StoreConfig::Local { root } => Ok(Box::new(LocalStorage::new(root))),
    }
}

/// Expand {topic}, {date} and {timestamp} in an object key
pub fn render_key(template: &str, topic: &str, now: DateTime<Utc>) -> String {
    template
        .replace("{topic}", topic)
        .replace("{date}", &now.format("%Y-%m-%d").to_string())
        .replace("{timestamp}", &now.format("%Y%m%dT%H%M%SZ").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_plain_key_unchanged() {
        let now = Utc::now();
        assert_eq!(render_key("exports/batch.json", "t", now), "exports/batch.json");
    }

    #[test]
    fn test_placeholders() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            render_key("{topic}/{date}/{timestamp}.json", "orders", now),
            "orders/2024-03-09/20240309T070501Z.json"
        );
    }
}
