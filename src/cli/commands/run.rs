use crate::broker::KafkaSource;
use crate::core::config::{
    load_or_default, CommitPolicy, Config, FailurePolicy, OffsetReset, StoreConfig,
};
use crate::pipeline::{Pipeline, RunReport, UploadOutcome};
use crate::storage::create_storage;
use crate::ArchiverError;
use clap::Args;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Broker addresses (host:port, comma separated)
    #[arg(long, env = "ARCHIVER_BROKERS", value_delimiter = ',')]
    pub brokers: Vec<String>,

    /// Topic to read from
    #[arg(short, long, env = "ARCHIVER_TOPIC")]
    pub topic: Option<String>,

    /// Consumer group id
    #[arg(short, long, env = "ARCHIVER_GROUP")]
    pub group: Option<String>,

    /// Where a new consumer group starts reading
    #[arg(long, value_enum, env = "ARCHIVER_OFFSET_RESET")]
    pub offset_reset: Option<OffsetReset>,

    /// When to commit consumed offsets
    #[arg(long, value_enum, env = "ARCHIVER_COMMIT")]
    pub commit: Option<CommitPolicy>,

    /// Messages per batch
    #[arg(short = 'n', long, env = "ARCHIVER_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Target S3 bucket
    #[arg(short, long, env = "ARCHIVER_BUCKET", conflicts_with = "local_dir")]
    pub bucket: Option<String>,

    /// AWS region
    #[arg(long, env = "ARCHIVER_REGION")]
    pub region: Option<String>,

    /// Endpoint URL for S3-compatible services
    #[arg(long, env = "ARCHIVER_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Write to a local directory instead of S3
    #[arg(long, env = "ARCHIVER_LOCAL_DIR", value_name = "DIR")]
    pub local_dir: Option<PathBuf>,

    /// Object key ({topic}, {date} and {timestamp} are expanded)
    #[arg(short, long, env = "ARCHIVER_KEY")]
    pub key: Option<String>,

    /// What a failed upload does to the exit status
    #[arg(long, value_enum, env = "ARCHIVER_ON_FAILURE")]
    pub on_failure: Option<FailurePolicy>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Layer command-line values over the loaded config
    pub fn apply(&self, config: &mut Config) {
        if !self.brokers.is_empty() {
            config.broker.brokers = self.brokers.clone();
        }
        if let Some(topic) = &self.topic {
            config.broker.topic = topic.clone();
        }
        if let Some(group) = &self.group {
            config.broker.group_id = group.clone();
        }
        if let Some(reset) = self.offset_reset {
            config.broker.offset_reset = reset;
        }
        if let Some(commit) = self.commit {
            config.broker.commit = commit;
        }
        if let Some(size) = self.batch_size {
            config.batch.size = size;
        }
        if let Some(key) = &self.key {
            config.upload.key = key.clone();
        }
        if let Some(policy) = self.on_failure {
            config.upload.on_failure = policy;
        }

        if let Some(root) = &self.local_dir {
            config.store = StoreConfig::Local { root: root.clone() };
            return;
        }

        let touches_s3 = self.bucket.is_some() || self.region.is_some() || self.endpoint.is_some();
        if touches_s3 && matches!(config.store, StoreConfig::Local { .. }) {
            config.store = StoreConfig::default();
        }
        if let StoreConfig::S3 {
            bucket,
            region,
            endpoint,
            ..
        } = &mut config.store
        {
            if let Some(b) = &self.bucket {
                *bucket = b.clone();
            }
            if let Some(r) = &self.region {
                *region = r.clone();
            }
            if let Some(e) = &self.endpoint {
                *endpoint = Some(e.clone());
            }
        }
    }
}

pub fn run(args: RunArgs, config_path: &Path) -> anyhow::Result<()> {
    let mut config = load_or_default(config_path)?;
    args.apply(&mut config);
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(execute(&config, !args.no_progress))?;

    print_report(&report);
    Ok(())
}

/// Connect to both ends and run one batch
pub async fn execute(config: &Config, show_progress: bool) -> crate::Result<RunReport> {
    let source = KafkaSource::connect(&config.broker)?;
    let store = create_storage(&config.store)
        .await
        .map_err(|e| ArchiverError::Config(format!("{:#}", e)))?;

    let mut pipeline = Pipeline::new(config, Box::new(source), store);
    if show_progress {
        pipeline = pipeline.with_progress(message_progress());
    }

    pipeline.run().await
}

fn message_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} messages")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb
}

fn print_report(report: &RunReport) {
    match &report.outcome {
        UploadOutcome::Uploaded => {
            println!(
                "{} Uploaded {} messages ({} bytes) to {}",
                "✓".green().bold(),
                report.messages,
                report.bytes,
                report.location.cyan()
            );
            if report.committed {
                println!("  Consumer offsets committed");
            }
        }
        UploadOutcome::Failed(reason) => {
            println!(
                "{} Upload of {} messages to {} failed: {}",
                "⚠".yellow().bold(),
                report.messages,
                report.location,
                reason
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    fn parse(argv: &[&str]) -> RunArgs {
        let mut full = vec!["run"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_overrides_apply() {
        let args = parse(&[
            "--brokers",
            "k1:9092,k2:9092",
            "--topic",
            "orders",
            "-n",
            "25",
            "--bucket",
            "archive",
            "--key",
            "orders/{date}.json",
            "--commit",
            "after-upload",
            "--on-failure",
            "fail",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.broker.brokers, vec!["k1:9092", "k2:9092"]);
        assert_eq!(config.broker.topic, "orders");
        assert_eq!(config.batch.size, 25);
        assert_eq!(config.broker.commit, CommitPolicy::AfterUpload);
        assert_eq!(config.upload.on_failure, FailurePolicy::Fail);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_dir_switches_store() {
        let args = parse(&["--local-dir", "/tmp/archive", "--key", "batch.json"]);
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(
            config.store,
            StoreConfig::Local {
                root: PathBuf::from("/tmp/archive")
            }
        );
    }

    #[test]
    fn test_bucket_and_local_dir_conflict() {
        let result = Harness::try_parse_from(["run", "--bucket", "b", "--local-dir", "/tmp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_args_keep_config() {
        let mut config = Config::default();
        RunArgs::default().apply(&mut config);
        assert_eq!(config, Config::default());
    }
}
