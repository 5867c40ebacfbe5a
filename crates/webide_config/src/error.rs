use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("GitLab URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("No configuration directory available, set WEBIDE_PREFERENCES_PATH")]
    MissingConfigDir,

    #[error("Configuration file {0} does not exist")]
    MissingFile(PathBuf),
}
