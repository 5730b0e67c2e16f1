//! One-shot drain of a topic into a single stored JSON document
//!
//! Idle -> Reading -> Uploading -> Terminated, with no way back. The reader
//! blocks until the batch is full; there is no timeout flush.
use crate::batch::{BatchAccumulator, BatchStatus};
use crate::broker::{decode_value, MessageSource};
use crate::core::config::{CommitPolicy, Config, FailurePolicy};
use crate::serializer;
use crate::storage::{render_key, ObjectStore};
use crate::{ArchiverError, Result};
use chrono::Utc;
use indicatif::ProgressBar;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Reading,
    Uploading,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    /// Write failed and the failure policy said to carry on
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub messages: usize,
    pub bytes: usize,
    pub location: String,
    pub outcome: UploadOutcome,
    pub committed: bool,
}

impl RunReport {
    pub fn uploaded(&self) -> bool {
        self.outcome == UploadOutcome::Uploaded
    }
}

pub struct Pipeline {
    source: Box<dyn MessageSource>,
    store: Box<dyn ObjectStore>,
    topic: String,
    batch_size: usize,
    indent: usize,
    key_template: String,
    commit: CommitPolicy,
    on_failure: FailurePolicy,
    state: RunState,
    progress: Option<ProgressBar>,
}

impl Pipeline {
    pub fn new(config: &Config, source: Box<dyn MessageSource>, store: Box<dyn ObjectStore>) -> Self {
        Self {
            source,
            store,
            topic: config.broker.topic.clone(),
            batch_size: config.batch.size,
            indent: config.batch.indent,
            key_template: config.upload.key.clone(),
            commit: config.broker.commit,
            on_failure: config.upload.on_failure,
            state: RunState::Idle,
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Read one full batch and upload it. Always ends in `Terminated`.
    pub async fn run(&mut self) -> Result<RunReport> {
        let result = self.read_and_upload().await;
        self.transition(RunState::Terminated);
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        result
    }

    async fn read_and_upload(&mut self) -> Result<RunReport> {
        let values = self.read_batch().await?;
        self.upload(values).await
    }

    async fn read_batch(&mut self) -> Result<Vec<Value>> {
        self.transition(RunState::Reading);
        let mut batch = BatchAccumulator::new(self.batch_size)?;

        if let Some(pb) = &self.progress {
            pb.set_length(self.batch_size as u64);
        }

        loop {
            let message = self.source.next_message().await?;
            let value = decode_value(&message)?;
            tracing::info!(
                key = %message.display_key(),
                partition = message.partition,
                offset = message.offset,
                value = %value,
                "received message"
            );

            let status = batch.push(value)?;

            if let Some(pb) = &self.progress {
                pb.inc(1);
            }

            if status == BatchStatus::Complete {
                break;
            }
        }

        Ok(batch.into_items())
    }

    async fn upload(&mut self, values: Vec<Value>) -> Result<RunReport> {
        self.transition(RunState::Uploading);

        let body = serializer::to_pretty_json(&values, self.indent)?;
        let key = render_key(&self.key_template, &self.topic, Utc::now());
        let location = self.store.location(&key);
        let bytes = body.len();

        let mut report = RunReport {
            messages: values.len(),
            bytes,
            location,
            outcome: UploadOutcome::Uploaded,
            committed: false,
        };

        match self.store.put_object(&key, body).await {
            Ok(()) => {
                tracing::info!(
                    messages = report.messages,
                    bytes,
                    location = %report.location,
                    "Uploaded batch"
                );
            }
            Err(e) => {
                let message = format!("{:#}", e);
                match self.on_failure {
                    FailurePolicy::Log => {
                        tracing::error!(location = %report.location, "Error uploading batch: {}", message);
                        report.outcome = UploadOutcome::Failed(message);
                        return Ok(report);
                    }
                    FailurePolicy::Fail => return Err(ArchiverError::Upload(message)),
                }
            }
        }

        if self.commit == CommitPolicy::AfterUpload {
            self.source.commit().await?;
            report.committed = true;
        }

        Ok(report)
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "pipeline state");
        self.state = next;
    }
}
