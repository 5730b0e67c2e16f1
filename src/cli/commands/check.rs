use crate::broker::kafka::probe_topic;
use crate::core::config::load_or_default;
use crate::storage::create_storage;
use anyhow::Context;
use clap::Args;
use colored::*;
use std::path::Path;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Seconds to wait for broker metadata
    #[arg(long, default_value = "10")]
    pub timeout: u64,

    /// Skip the broker check
    #[arg(long)]
    pub skip_broker: bool,

    /// Skip the object store check
    #[arg(long)]
    pub skip_store: bool,
}

pub fn run(args: CheckArgs, config_path: &Path) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;
    config.validate()?;

    if !args.skip_broker {
        let partitions = probe_topic(&config.broker, Duration::from_secs(args.timeout))?;
        println!(
            "{} topic {} reachable ({} partitions)",
            "✓".green().bold(),
            config.broker.topic.cyan(),
            partitions
        );
    }

    if !args.skip_store {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let location = runtime.block_on(async {
            let store = create_storage(&config.store).await?;
            store.verify_access().await?;
            Ok::<_, anyhow::Error>(store.location(&config.upload.key))
        })
        .context("object store check failed")?;

        println!("{} object store writable at {}", "✓".green().bold(), location.cyan());
    }

    Ok(())
}
