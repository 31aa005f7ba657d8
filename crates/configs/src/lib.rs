//! # configs
//!
//! Typed runtime settings for Clutch Takes, layered from an optional
//! config file, then `CLUTCH_`-prefixed environment variables, on top of
//! built-in defaults. Secrets are secrecy-wrapped so they never land in
//! debug output or logs.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite url, e.g. `sqlite://clutch_takes.db`.
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct ModerationSettings {
    /// When false the classifier is skipped and takes persist unflagged.
    pub enabled: bool,
    pub model: String,
    /// Absent is tolerated: the classifier logs a warning and falls back
    /// to ambient credentials instead of failing startup.
    pub api_key: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub moderation: ModerationSettings,
}

impl Settings {
    /// Loads `config/default.toml` (if present), then the environment:
    /// `CLUTCH_SERVER__PORT=9000`, `CLUTCH_MODERATION__ENABLED=false`, ...
    ///
    /// The API key additionally falls back to the conventional
    /// `GOOGLE_API_KEY` / `GEMINI_API_KEY` variables.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let mut settings: Settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "sqlite://clutch_takes.db")?
            .set_default("moderation.enabled", true)?
            .set_default("moderation.model", "gemini-1.5-flash-latest")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("CLUTCH").separator("__"))
            .build()?
            .try_deserialize()?;

        if settings.moderation.api_key.is_none() {
            settings.moderation.api_key = std::env::var("GOOGLE_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .ok()
                .map(SecretString::from);
        }

        Ok(settings)
    }
}
