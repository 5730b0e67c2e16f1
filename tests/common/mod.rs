/// Shared doubles for pipeline tests
///
/// An in-memory message source and object stores, so runs can be exercised
/// without a broker or a cloud account.
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use topic_archiver::broker::{MessageSource, SourceMessage};
use topic_archiver::core::config::{Config, StoreConfig};
use topic_archiver::storage::ObjectStore;

/// Replays queued records, then waits forever like an idle topic
pub struct MemorySource {
    queue: VecDeque<SourceMessage>,
    pub commits: Arc<AtomicUsize>,
    pub delivered: Arc<AtomicUsize>,
}

impl MemorySource {
    pub fn new(messages: Vec<SourceMessage>) -> Self {
        Self {
            queue: messages.into(),
            commits: Arc::new(AtomicUsize::new(0)),
            delivered: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Records holding the given JSON texts at increasing offsets
    pub fn from_json(texts: &[&str]) -> Self {
        let messages = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                SourceMessage::new(text.as_bytes().to_vec())
                    .with_key(format!("key-{}", i))
                    .at(0, i as i64)
            })
            .collect();
        Self::new(messages)
    }
}

#[async_trait]
impl MessageSource for MemorySource {
    async fn next_message(&mut self) -> topic_archiver::Result<SourceMessage> {
        match self.queue.pop_front() {
            Some(message) => {
                self.delivered.fetch_add(1, Ordering::SeqCst);
                Ok(message)
            }
            None => std::future::pending().await,
        }
    }

    async fn commit(&mut self) -> topic_archiver::Result<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    pub objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> anyhow::Result<()> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn verify_access(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("mem://{}", key)
    }
}

/// Rejects every write, like a store with bad credentials
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn put_object(&self, _key: &str, _body: Vec<u8>) -> anyhow::Result<()> {
        anyhow::bail!("InvalidAccessKeyId: The AWS Access Key Id you provided does not exist")
    }

    async fn verify_access(&self) -> anyhow::Result<()> {
        anyhow::bail!("access denied")
    }

    fn location(&self, key: &str) -> String {
        format!("s3://denied/{}", key)
    }
}

/// Default config with a bucket and key filled in
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.store = StoreConfig::S3 {
        bucket: "test-bucket".to_string(),
        region: "us-east-1".to_string(),
        endpoint: None,
        access_key_id: None,
        secret_access_key: None,
    };
    config.upload.key = "purchases/batch.json".to_string();
    config
}

/// `count` purchase records as JSON text
#[allow(dead_code)]
pub fn purchase_records(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!(r#"{{"purchase_id": {}, "amount": {}.5, "item": "sku-{}"}}"#, i, i * 10, i))
        .collect()
}
