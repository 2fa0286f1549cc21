use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::locale::Locale;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub members: MembersConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Путь к файлу SQLite или `:memory:`
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MembersConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for MembersConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl MembersConfig {
    /// Размер страницы из запроса с учётом значения по умолчанию и верхней границы
    pub fn resolve_limit(&self, requested: Option<usize>) -> usize {
        match requested {
            Some(limit) if limit >= 1 => limit.min(self.max_page_size.max(1)),
            _ => self.default_page_size.max(1),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub locale: Locale,
    pub recent_members: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            locale: Locale::Es,
            recent_members: 5,
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[database]
path = "target/db/gym.db"

[members]
default_page_size = 10
max_page_size = 100

[dashboard]
locale = "es"
recent_members = 5
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. `GYM_CONFIG` environment variable
/// 2. Next to the executable (for production)
/// 3. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(path) = std::env::var("GYM_CONFIG") {
        tracing::info!("Loading config from GYM_CONFIG: {}", path);
        return parse_config(&std::fs::read_to_string(&path)?);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.members.default_page_size == 0 {
        anyhow::bail!("members.default_page_size must be at least 1");
    }
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(&config.database.path)
}
