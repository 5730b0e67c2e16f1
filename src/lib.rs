pub mod batch;
pub mod broker;
pub mod cli;
pub mod core;
pub mod pipeline;
pub mod serializer;
pub mod storage;

pub use crate::batch::{BatchAccumulator, BatchStatus};
pub use crate::core::config::Config;
pub use crate::pipeline::{Pipeline, RunReport, RunState, UploadOutcome};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Broker error: {0}")]
    Broker(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Batch error: {0}")]
    Batch(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("{0}")]
    Other(String),
}

impl From<rdkafka::error::KafkaError> for ArchiverError {
    fn from(e: rdkafka::error::KafkaError) -> Self {
        ArchiverError::Broker(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
