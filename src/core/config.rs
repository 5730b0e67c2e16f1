use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub broker: BrokerConfig,
    pub batch: BatchConfig,
    pub store: StoreConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    /// Bootstrap servers as host:port
    pub brokers: Vec<String>,
    pub topic: String,
    /// Consumer group under which offsets are tracked
    pub group_id: String,
    pub offset_reset: OffsetReset,
    pub commit: CommitPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of messages collected before the upload
    pub size: usize,
    /// Spaces per indentation level in the uploaded JSON
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    S3 {
        bucket: String,
        #[serde(default = "default_region")]
        region: String,
        #[serde(default)]
        endpoint: Option<String>, // For S3-compatible services
        #[serde(default)]
        access_key_id: Option<String>,
        #[serde(default)]
        secret_access_key: Option<String>,
    },
    Local {
        root: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Object key; may contain {topic}, {date} and {timestamp}
    pub key: String,
    pub on_failure: FailurePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OffsetReset {
    Earliest,
    Latest,
}

impl OffsetReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        }
    }
}

/// When consumed offsets are committed back to the broker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Broker client commits continuously in the background
    Auto,
    /// Commit once, after the object has been written
    AfterUpload,
}

/// What a failed upload does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Log the error and finish normally
    Log,
    /// Return the error so the process exits non-zero
    Fail,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            brokers: vec!["localhost:29092".to_string()],
            topic: "postgres.public.purchase_trends".to_string(),
            group_id: "topic-archiver".to_string(),
            offset_reset: OffsetReset::Earliest,
            commit: CommitPolicy::Auto,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { size: 10, indent: 4 }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        // Bucket is left blank on purpose; validate() refuses to run until it is set
        StoreConfig::S3 {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            on_failure: FailurePolicy::Log,
        }
    }
}

impl Config {
    /// Copy with the secret access key masked, for display
    pub fn redacted(&self) -> Config {
        let mut config = self.clone();
        if let StoreConfig::S3 {
            secret_access_key: Some(secret),
            ..
        } = &mut config.store
        {
            *secret = "********".to_string();
        }
        config
    }

    pub fn validate(&self) -> Result<(), crate::ArchiverError> {
        let invalid = |msg: &str| Err(crate::ArchiverError::Config(msg.to_string()));

        if self.broker.brokers.iter().all(|b| b.trim().is_empty()) {
            return invalid("at least one broker address is required");
        }
        if self.broker.topic.trim().is_empty() {
            return invalid("broker.topic must not be empty");
        }
        if self.broker.group_id.trim().is_empty() {
            return invalid("broker.group_id must not be empty");
        }
        if self.batch.size == 0 {
            return invalid("batch.size must be at least 1");
        }
        if let StoreConfig::S3 { bucket, .. } = &self.store {
            if bucket.trim().is_empty() {
                return invalid("store.bucket must not be empty");
            }
        }
        if self.upload.key.trim().is_empty() {
            return invalid("upload.key must not be empty");
        }
        Ok(())
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::ArchiverError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::ArchiverError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

/// Load the file if it exists, otherwise fall back to defaults
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Config, crate::ArchiverError> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.as_ref().display(), "no config file, using defaults");
        Ok(default_config())
    }
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), crate::ArchiverError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::ArchiverError::Config(format!("Failed to serialize config: {}", e)))?;
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(())
}
