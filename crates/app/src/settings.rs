//! Application settings, read from `settings.toml` in the working directory.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter applied to the workspace crates (e.g. `info`).
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    /// In-memory store, lost on shutdown. Useful for local experiments.
    Memory,
    /// File-backed SQLite database at the given path.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct EngineSettings {
    /// Reject a creation whose (from, to, amount) triple is already recorded.
    #[serde(default)]
    pub reject_duplicates: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub engine: Option<EngineSettings>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
