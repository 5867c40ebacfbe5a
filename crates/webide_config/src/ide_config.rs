use std::path::{Path, PathBuf};

use derive_setters::Setters;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::ConfigError;

const ENV_PREFIX: &str = "WEBIDE";

lazy_static! {
    static ref DEFAULT_GITLAB_URL: Url = Url::parse("https://gitlab.com").unwrap();
}

/// Connection and storage settings for the commit engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(strip_option, into)]
pub struct IdeConfig {
    /// Base URL of the GitLab instance, without the `/api/v4` suffix
    #[serde(default = "default_gitlab_url")]
    pub gitlab_url: Url,

    /// Personal access token sent as `PRIVATE-TOKEN`
    #[serde(default)]
    pub token: Option<String>,

    /// Project used when the command line does not name one
    #[serde(default)]
    pub project: Option<String>,

    /// Where accepted prompts are remembered
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,

    #[serde(default = "default_connect_timeout")]
    pub http_connect_timeout_secs: u64,
}

fn default_gitlab_url() -> Url {
    DEFAULT_GITLAB_URL.clone()
}

fn default_connect_timeout() -> u64 {
    30
}

impl Default for IdeConfig {
    fn default() -> Self {
        Self {
            gitlab_url: default_gitlab_url(),
            token: None,
            project: None,
            preferences_path: None,
            http_connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl IdeConfig {
    /// `{config_dir}/webide`
    pub fn base_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("webide"))
    }

    /// Loads `.env`, then the user configuration file, then `WEBIDE_*`
    /// environment variables. Later sources win.
    ///
    /// # Examples of environment variables:
    /// - `WEBIDE_GITLAB_URL` -> `gitlab_url`
    /// - `WEBIDE_TOKEN` -> `token`
    /// - `WEBIDE_HTTP_CONNECT_TIMEOUT_SECS` -> `http_connect_timeout_secs`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = Self::base_path().map(|dir| dir.join("config.toml"));
        let source = file.as_deref().filter(|path| path.exists());
        Self::build(source, true)
    }

    /// Loads an explicit configuration file, ignoring the environment
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        Self::build(Some(path), false)
    }

    fn build(file: Option<&Path>, with_env: bool) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            debug!(path = %path.display(), "Reading configuration file");
            builder = builder.add_source(config::File::from(path).required(true));
        }
        if with_env {
            builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
        }

        let config: IdeConfig = builder.build()?.try_deserialize()?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        match self.gitlab_url.scheme() {
            "http" | "https" => Ok(self),
            _ => Err(ConfigError::UnsupportedScheme(self.gitlab_url.to_string())),
        }
    }

    /// Explicit preference file or `{config_dir}/webide/preferences.json`
    pub fn preferences_file(&self) -> Result<PathBuf, ConfigError> {
        match &self.preferences_path {
            Some(path) => Ok(path.clone()),
            None => Self::base_path()
                .map(|dir| dir.join("preferences.json"))
                .ok_or(ConfigError::MissingConfigDir),
        }
    }
}
