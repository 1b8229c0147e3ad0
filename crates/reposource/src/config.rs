//! User configuration file (`config.toml`): logging settings and the code-host
//! connections to resolve against.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::conn::{Connections, RawConnection};
use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    #[serde(default)]
    pub connections: Vec<RawConnection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub compact: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

impl UserConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Compile the configured connections. Any invalid connection fails the
    /// whole set so a misconfigured host is never silently skipped.
    pub fn connections(&self) -> Result<Connections, ConfigError> {
        Connections::from_raw(self.connections.clone())
    }
}

/// Load `<home>/config.toml`. A missing file is `Ok(None)`.
pub fn load_user_config(home: &Path) -> Result<Option<UserConfig>, ConfigError> {
    load_config_file(&home.join(CONFIG_FILE_NAME))
}

/// Load an explicit config file path. A missing file is `Ok(None)`.
pub fn load_config_file(path: &Path) -> Result<Option<UserConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = UserConfig::from_toml_str(&s)?;
    tracing::debug!(
        "loaded {} ({} connection(s))",
        path.display(),
        cfg.connections.len()
    );
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}
