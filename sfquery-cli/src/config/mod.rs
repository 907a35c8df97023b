//! Credential configuration
//!
//! Values are merged from, highest precedence first: command-line flags,
//! `SFQUERY_*` environment variables, then a TOML file (`--config` or
//! `<config dir>/sfquery/config.toml`).

use crate::api::Credentials;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_BASE_URI: &str = "SFQUERY_BASE_URI";
pub const ENV_CLIENT_ID: &str = "SFQUERY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SFQUERY_CLIENT_SECRET";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing `{0}`: set it in the config file, the environment or on the command line")]
    Missing(&'static str),
}

/// `config.toml` contents; every key optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

impl ConfigFile {
    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`; a missing file at the default location is not an error
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(path, &text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Values from `other` win where present
    fn overlay(self, other: ConfigFile) -> Self {
        Self {
            base_uri: other.base_uri.or(self.base_uri),
            client_id: other.client_id.or(self.client_id),
            client_secret: other.client_secret.or(self.client_secret),
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sfquery").join("config.toml"))
}

/// Values taken from the `SFQUERY_*` variables, via any lookup function
pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> ConfigFile {
    ConfigFile {
        base_uri: lookup(ENV_BASE_URI),
        client_id: lookup(ENV_CLIENT_ID),
        client_secret: lookup(ENV_CLIENT_SECRET),
    }
}

/// Merge the three layers into credentials
pub fn resolve(
    file: ConfigFile,
    env: ConfigFile,
    flags: ConfigFile,
) -> Result<Credentials, ConfigError> {
    let merged = file.overlay(env).overlay(flags);
    Ok(Credentials::new(
        merged.base_uri.ok_or(ConfigError::Missing("base_uri"))?,
        merged.client_id.ok_or(ConfigError::Missing("client_id"))?,
        merged
            .client_secret
            .ok_or(ConfigError::Missing("client_secret"))?,
    ))
}

/// Load credentials the way the CLI does: `.env`, file, environment, flags
pub fn load_credentials(
    config_path: Option<&Path>,
    flags: ConfigFile,
) -> Result<Credentials, ConfigError> {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let file = match config_path {
        Some(path) => ConfigFile::load(path, true)?,
        None => match default_config_path() {
            Some(path) => ConfigFile::load(&path, false)?,
            None => ConfigFile::default(),
        },
    };
    let env = from_env(|key| std::env::var(key).ok());
    resolve(file, env, flags)
}
