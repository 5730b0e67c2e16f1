use clap::Parser;
use colored::*;
use std::process;
use topic_archiver::cli::{exit_code, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then ARCHIVER_LOG, then -v count
    let log_level = std::env::var("ARCHIVER_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config_path();

    match cli.command {
        Commands::Run(args) => topic_archiver::cli::commands::run::run(args, &config_path),
        Commands::Check(args) => topic_archiver::cli::commands::check::run(args, &config_path),
        Commands::Config(args) => topic_archiver::cli::commands::config::run(args, &config_path),
    }
}
