use std::path::PathBuf;
use std::sync::OnceLock;

static ARCHIVER_HOME: OnceLock<PathBuf> = OnceLock::new();

/// Get the archiver home directory
/// Checks ARCHIVER_HOME environment variable, falls back to ${HOME}/.topic-archiver
pub fn archiver_home() -> PathBuf {
    ARCHIVER_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("ARCHIVER_HOME") {
                PathBuf::from(path)
            } else {
                let home = std::env::var("HOME").unwrap_or_else(|_| {
                    std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string())
                });
                PathBuf::from(home).join(".topic-archiver")
            }
        })
        .clone()
}

/// Default location of the config file.
/// ARCHIVER_CONFIG wins over ARCHIVER_HOME/config.toml. Not cached, so tests can point it elsewhere.
pub fn default_config_path() -> PathBuf {
    match std::env::var("ARCHIVER_CONFIG") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => archiver_home().join("config.toml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_ends_with_dir_name_or_override() {
        let home = archiver_home();
        if std::env::var("ARCHIVER_HOME").is_err() {
            assert!(home.ends_with(".topic-archiver"));
        }
    }
}
