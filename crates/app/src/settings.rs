//! Handles settings for the application. Configuration is read from an
//! optional TOML file (`config/payees.toml` by default) and from
//! `PAYEES__*` environment variables.
//!
//! ```toml
//! backend = "mock"
//!
//! [app]
//! level = "info"
//!
//! [remote]
//! base_url = "http://127.0.0.1:3000"
//!
//! [mock]
//! seed = "config/seed.json"
//! latency_ms = 0
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 3000
//! ```
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/payees.toml";

/// Which store and resolver back the address book.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Mock,
    Remote,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Remote {
    pub base_url: String,
}

impl Default for Remote {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Mock {
    /// JSON file with the initial payees and PayID directory.
    pub seed: Option<String>,
    pub latency_ms: u64,
}

impl Mock {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub backend: Backend,
    pub remote: Remote,
    pub mock: Mock,
    pub server: Server,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(false))
            .add_source(Environment::with_prefix("PAYEES").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_select_mock_backend() {
        let settings = Settings::default();
        assert_eq!(settings.backend, Backend::Mock);
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.remote.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "backend = \"remote\"\n[remote]\nbase_url = \"http://payees.test\"\n[mock]\nlatency_ms = 800\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.backend, Backend::Remote);
        assert_eq!(settings.remote.base_url, "http://payees.test");
        assert_eq!(settings.mock.latency(), Duration::from_millis(800));
        assert_eq!(settings.app.level, "info");
    }
}
