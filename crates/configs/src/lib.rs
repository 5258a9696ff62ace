//! # configs
//!
//! Layered runtime configuration: built-in defaults, an optional
//! `rango.toml`, then `RANGO__`-prefixed environment variables (e.g.
//! `RANGO__SERVER__PORT=8000`). A `.env` file is honored for local
//! development.
//!
//! The search API key never travels through the layered sources; it is
//! read from its own key file once at startup and held as a
//! [`SecretString`]. Rotating the key means restarting the process.

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// Search cannot function at all without its key, so an unreadable key
    /// file is fatal rather than a silent degradation.
    #[error("search API key file '{0}' could not be read: {1}")]
    SearchKey(String, std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    /// HMAC key for the session cookie signature.
    pub signing_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    pub root: PathBuf,
    pub url_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub key_file: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub media: MediaSettings,
    pub search: SearchSettings,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "sqlite:rango.db")?
            .set_default("session.signing_secret", "rango-dev-secret")?
            .set_default("media.root", "./data/media")?
            .set_default("media.url_prefix", "/media")?
            .set_default("search.enabled", false)?
            .set_default("search.endpoint", "https://webhose.io/filterWebContent")?
            .set_default("search.key_file", "search.key")?
            .add_source(File::with_name("rango").required(false))
            .add_source(Environment::with_prefix("RANGO").separator("__"))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Reads the search API key file once, at startup.
    ///
    /// Returns None when search is disabled; errors when it is enabled and
    /// the file cannot be read.
    pub fn load_search_key(&self) -> Result<Option<SecretString>, ConfigError> {
        if !self.search.enabled {
            info!("search is disabled; no API key loaded");
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.search.key_file).map_err(|err| {
            ConfigError::SearchKey(self.search.key_file.display().to_string(), err)
        })?;
        Ok(Some(SecretString::from(raw.trim().to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(search_enabled: bool, key_file: &str) -> Settings {
        Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            database: DatabaseSettings {
                url: "sqlite::memory:".into(),
            },
            session: SessionSettings {
                signing_secret: SecretString::from("test".to_string()),
            },
            media: MediaSettings {
                root: "./data/media".into(),
                url_prefix: "/media".into(),
            },
            search: SearchSettings {
                enabled: search_enabled,
                endpoint: "https://webhose.io/filterWebContent".into(),
                key_file: key_file.into(),
            },
        }
    }

    #[test]
    fn disabled_search_needs_no_key_file() {
        let key = settings(false, "/definitely/not/here").load_search_key().unwrap();
        assert!(key.is_none());
    }

    #[test]
    fn enabled_search_with_missing_key_file_fails_fast() {
        let err = settings(true, "/definitely/not/here")
            .load_search_key()
            .unwrap_err();
        assert!(matches!(err, ConfigError::SearchKey(..)));
    }

    #[test]
    fn defaults_load_without_any_sources() {
        let loaded = Settings::load().unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert!(!loaded.search.enabled);
    }
}
