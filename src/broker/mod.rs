//! Message broker input for the archiver
//!
//! A `MessageSource` hands out raw records one at a time and can commit the
//! consumer's position once the batch has been stored.
use crate::{ArchiverError, Result};
use async_trait::async_trait;
use serde_json::Value;

pub mod kafka;

pub use kafka::KafkaSource;

/// A raw record as read from the broker
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMessage {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub partition: i32,
    pub offset: i64,
}

impl SourceMessage {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: None,
            value: Some(value.into()),
            partition: 0,
            offset: 0,
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn at(mut self, partition: i32, offset: i64) -> Self {
        self.partition = partition;
        self.offset = offset;
        self
    }

    /// Key rendered for logs
    pub fn display_key(&self) -> String {
        match &self.key {
            Some(key) => String::from_utf8_lossy(key).into_owned(),
            None => "<none>".to_string(),
        }
    }
}

#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next record. Blocks for as long as the topic stays empty.
    async fn next_message(&mut self) -> Result<SourceMessage>;

    /// Commit the current consumer position
    async fn commit(&mut self) -> Result<()>;
}

/// Decode a record's value as UTF-8 text holding one JSON document
fn decode_text(message: &SourceMessage) -> Result<&str> {
    let bytes = message.value.as_deref().ok_or_else(|| {
        ArchiverError::Decode(format!(
            "message at partition {} offset {} has no payload",
            message.partition, message.offset
        ))
    })?;

    std::str::from_utf8(bytes).map_err(|e| {
        ArchiverError::Decode(format!(
            "message at partition {} offset {} is not valid UTF-8: {}",
            message.partition, message.offset, e
        ))
    })
}

pub fn decode_value(message: &SourceMessage) -> Result<Value> {
    let text = decode_text(message)?;
    Ok(serde_json::from_str(text)?)
}
