//! Kafka consumer backed by librdkafka
use super::{MessageSource, SourceMessage};
use crate::core::config::{BrokerConfig, CommitPolicy};
use crate::Result;
use async_trait::async_trait;
use rdkafka::config::{ClientConfig, RDKafkaLogLevel};
use rdkafka::consumer::{BaseConsumer, CommitMode, Consumer, StreamConsumer};
use rdkafka::message::Message;
use std::time::Duration;

pub struct KafkaSource {
    consumer: StreamConsumer,
    topic: String,
}

/// Build the librdkafka settings for one consumer group
pub fn client_config(config: &BrokerConfig) -> ClientConfig {
    let auto_commit = match config.commit {
        CommitPolicy::Auto => "true",
        CommitPolicy::AfterUpload => "false",
    };

    let mut client = ClientConfig::new();
    client
        .set("bootstrap.servers", config.brokers.join(","))
        .set("group.id", &config.group_id)
        .set("auto.offset.reset", config.offset_reset.as_str())
        .set("enable.auto.commit", auto_commit)
        .set_log_level(RDKafkaLogLevel::Warning);
    client
}

impl KafkaSource {
    pub fn connect(config: &BrokerConfig) -> Result<Self> {
        let consumer: StreamConsumer = client_config(config).create()?;
        consumer.subscribe(&[config.topic.as_str()])?;

        tracing::info!(
            topic = %config.topic,
            brokers = %config.brokers.join(","),
            group = %config.group_id,
            "Listening to Kafka topic"
        );

        Ok(Self {
            consumer,
            topic: config.topic.clone(),
        })
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn next_message(&mut self) -> Result<SourceMessage> {
        let message = self.consumer.recv().await?;

        Ok(SourceMessage {
            key: message.key().map(<[u8]>::to_vec),
            value: message.payload().map(<[u8]>::to_vec),
            partition: message.partition(),
            offset: message.offset(),
        })
    }

    async fn commit(&mut self) -> Result<()> {
        self.consumer.commit_consumer_state(CommitMode::Sync)?;
        tracing::debug!(topic = %self.topic, "committed consumer position");
        Ok(())
    }
}

/// Fetch topic metadata with a short-lived consumer and return the partition count
pub fn probe_topic(config: &BrokerConfig, timeout: Duration) -> Result<usize> {
    let consumer: BaseConsumer = client_config(config).create()?;
    let metadata = consumer.fetch_metadata(Some(config.topic.as_str()), timeout)?;

    let topic = metadata
        .topics()
        .iter()
        .find(|t| t.name() == config.topic)
        .ok_or_else(|| {
            crate::ArchiverError::Broker(format!("topic {} not found in metadata", config.topic))
        })?;

    if let Some(err) = topic.error() {
        return Err(crate::ArchiverError::Broker(format!(
            "topic {} unavailable: {:?}",
            config.topic, err
        )));
    }

    Ok(topic.partitions().len())
}
