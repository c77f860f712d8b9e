use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use once_cell::sync::Lazy;
use serde::Deserialize;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("Failed to load config: {}", e)));

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub run_migrations: bool,
    pub seed_dir: Option<PathBuf>,
    pub log_level: String,
}

impl AppConfig {
    /// Defaults overridden by `QUIZ__*` environment variables,
    /// e.g. `QUIZ__SERVER__PORT=9000` or `QUIZ__DATABASE_URL=postgres://...`.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.address", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("storage", "postgres")?
            .set_default("run_migrations", true)?
            .set_default("log_level", "debug")?
            .add_source(
                Environment::with_prefix("QUIZ")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
