//! Server configuration.
//!
//! Read from an optional TOML file, then overridden by `PRESCRIBE_*`
//! environment variables. List-valued keys (`cors_allowed_origins`, `sites`)
//! take comma-separated values from the environment.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use config::{Config, Environment, File};
use prescribe_api::ApiSettings;
use prescribe_core::{SiteCatalog, catalog::DEFAULT_SITES};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "PRESCRIBE";

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  pub stage:                Option<String>,
  pub cors_allowed_origins: Vec<String>,
  pub sites:                Vec<String>,
  pub request_timeout_ms:   u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8000,
      store_path:           PathBuf::from("prescriptions.db"),
      stage:                None,
      cors_allowed_origins: Vec::new(),
      sites:                DEFAULT_SITES.iter().map(|s| s.to_string()).collect(),
      request_timeout_ms:   5000,
    }
  }
}

impl ServerConfig {
  /// Load from `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::load_with(path, environment())
  }

  fn load_with(path: &Path, env: Environment) -> anyhow::Result<Self> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(env)
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn catalog(&self) -> SiteCatalog { SiteCatalog::new(self.sites.iter().cloned()) }

  pub fn api_settings(&self) -> ApiSettings {
    ApiSettings {
      stage:                self.stage.clone(),
      cors_allowed_origins: self.cors_allowed_origins.clone(),
      request_timeout:      Duration::from_millis(self.request_timeout_ms),
    }
  }

  /// Log the settings an operator is most likely to get wrong.
  pub fn log_summary(&self) {
    if self.cors_allowed_origins.is_empty() {
      tracing::warn!("cors_allowed_origins not set, defaulting to empty list");
    } else {
      tracing::info!(origins = ?self.cors_allowed_origins, "CORS allowed origins");
    }
    if self.sites.is_empty() {
      tracing::warn!("site catalog is empty; every prescription request will be rejected");
    }
    match &self.stage {
      Some(stage) => tracing::info!(%stage, "deployment stage"),
      None => tracing::info!("deployment stage not set"),
    }
  }
}

fn environment() -> Environment {
  Environment::with_prefix(ENV_PREFIX)
    .try_parsing(true)
    .list_separator(",")
    .with_list_parse_key("cors_allowed_origins")
    .with_list_parse_key("sites")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
