pub mod commands;

use crate::ArchiverError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "topic-archiver",
    version,
    about = "Archive a batch of Kafka messages as one JSON document in object storage",
    long_about = "topic-archiver reads a fixed number of JSON messages from a Kafka topic, \
                  renders them as a single pretty-printed JSON array and writes it to S3 \
                  (or a local directory) in one PUT, then exits."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to $ARCHIVER_HOME/config.toml)
    #[arg(short, long, env = "ARCHIVER_CONFIG", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::core::paths::default_config_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Consume one batch and upload it
    Run(commands::run::RunArgs),

    /// Check broker and object store connectivity
    Check(commands::check::CheckArgs),

    /// Create or inspect the config file
    Config(commands::config::ConfigArgs),
}

/// Process exit status for a failed command, by error kind
pub fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<ArchiverError>() {
        Some(ArchiverError::Config(_)) => 2,
        Some(ArchiverError::Io(_)) => 3,
        Some(ArchiverError::Decode(_)) | Some(ArchiverError::Parse(_)) => 4,
        Some(ArchiverError::Broker(_)) => 5,
        Some(ArchiverError::Upload(_)) => 6,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use clap::CommandFactory;

    fn code_for(e: ArchiverError) -> i32 {
        exit_code(&anyhow::Error::from(e))
    }

    #[test]
    fn test_exit_code_per_error_kind() {
        assert_eq!(code_for(ArchiverError::Config("x".into())), 2);
        assert_eq!(code_for(ArchiverError::Io(std::io::Error::other("disk"))), 3);
        assert_eq!(code_for(ArchiverError::Decode("bad utf-8".into())), 4);
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(code_for(ArchiverError::Parse(parse)), 4);
        assert_eq!(code_for(ArchiverError::Broker("down".into())), 5);
        assert_eq!(code_for(ArchiverError::Upload("denied".into())), 6);
        assert_eq!(code_for(ArchiverError::Batch("full".into())), 1);
        assert_eq!(code_for(ArchiverError::Other("?".into())), 1);
    }

    #[test]
    fn test_exit_code_through_context() {
        let wrapped = Err::<(), _>(ArchiverError::Broker("no leader".into()))
            .context("broker check failed")
            .unwrap_err();
        assert_eq!(exit_code(&wrapped), 5);
    }

    #[test]
    fn test_exit_code_for_plain_anyhow() {
        assert_eq!(exit_code(&anyhow::anyhow!("something else")), 1);
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_config_path() {
        let cli = Cli::parse_from(["topic-archiver", "--config", "/tmp/a.toml", "config", "show"]);
        assert_eq!(cli.config_path(), PathBuf::from("/tmp/a.toml"));
    }
}
