//! Application settings, read from an optional `settings.toml` and
//! overridden by `AGRIMARKET__*` environment variables
//! (e.g. `AGRIMARKET__SERVER__PORT=9000`).

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("agrimarket.db".to_string())
    }
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
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub storage_dir: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl Default for Server {
    fn default() -> Self {
        let http = server::ServerConfig::default();
        Self {
            bind: None,
            port: 8000,
            database: Database::default(),
            secret_key: http.secret_key,
            access_token_expire_minutes: http.access_token_expire_minutes,
            storage_dir: http.storage_dir,
            allowed_origins: http.allowed_origins,
        }
    }
}

impl Server {
    pub fn http_config(&self) -> server::ServerConfig {
        server::ServerConfig {
            secret_key: self.secret_key.clone(),
            access_token_expire_minutes: self.access_token_expire_minutes,
            storage_dir: self.storage_dir.clone(),
            allowed_origins: self.allowed_origins.clone(),
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == server::ServerConfig::default().secret_key
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("AGRIMARKET")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
