use std::{io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

/// Base URL of the PRH open data business information service.
pub const DEFAULT_BASE_URL: &str = "http://avoindata.prh.fi/bis/v1";

/// Configuration for registry lookups.
///
/// This struct holds the settings that control where registry requests are
/// sent and how long they may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The registry endpoint.
    ///
    /// Records are fetched from `{base_url}/{business_id}`.
    base_url: String,

    /// Request timeout, in seconds.
    timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns the registry endpoint, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Replaces the registry endpoint.
    pub fn set_base_url(&mut self, base_url: String) {
        self.base_url = base_url;
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid configuration TOML.
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_base_url")]
        base_url: String,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                base_url,
                timeout_secs,
            } => Self {
                base_url,
                timeout_secs,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            base_url: config.base_url,
            timeout_secs: config.timeout_secs,
        }
    }
}
