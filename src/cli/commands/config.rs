use crate::core::config::{default_config, load_or_default, save_config, Config};
use clap::{Args, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a config file with default values
    Init {
        /// Destination (defaults to the active config path)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML
    Show,
}

pub fn run(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Init { output, force } => {
            let target = output.unwrap_or_else(|| config_path.to_path_buf());
            if target.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    target.display()
                );
            }
            save_config(&target, &default_config())?;
            println!("{} Wrote {}", "✓".green().bold(), target.display());
            println!("  Set store.bucket and upload.key before running");
        }
        ConfigCommand::Show => {
            let config = load_or_default(config_path)?;
            print!("{}", render_config(&config)?);
            if let Err(e) = config.validate() {
                eprintln!("{} {}", "warning:".yellow().bold(), e);
            }
        }
    }
    Ok(())
}

/// TOML view of the config with secrets masked
pub fn render_config(config: &Config) -> anyhow::Result<String> {
    Ok(toml::to_string_pretty(&config.redacted())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_to_clobber() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let init = |force| ConfigArgs {
            command: ConfigCommand::Init { output: None, force },
        };

        run(init(false), &path).unwrap();
        assert!(path.exists());
        assert!(run(init(false), &path).is_err());
        assert!(run(init(true), &path).is_ok());
    }

    #[test]
    fn test_show_masks_secret_key() {
        let mut config = default_config();
        config.store = crate::core::config::StoreConfig::S3 {
            bucket: "archive".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("wJalrXUtnFEMI/K7MDENG".to_string()),
        };

        let rendered = render_config(&config).unwrap();
        assert!(!rendered.contains("wJalrXUtnFEMI"));
        assert!(rendered.contains("secret_access_key = \"********\""));
        assert!(rendered.contains("AKIAEXAMPLE"));
    }
}
