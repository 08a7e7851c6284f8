use serde::{Deserialize, Serialize};

/// Environment variable consulted when the config file carries no TMDB token.
pub const TOKEN_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenConfig {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default)]
    pub tlscert: Option<String>,
    #[serde(default)]
    pub tlskey: Option<String>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: None,
            port: default_port(),
            tlscert: None,
            tlskey: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(alias = "apibaseurl")]
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(alias = "imagebaseurl")]
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(alias = "apikey")]
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub appwrite: Option<AppwriteConfig>,
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppwriteConfig {
    #[serde(default = "default_appwrite_endpoint")]
    pub endpoint: String,
    #[serde(alias = "projectid")]
    pub project_id: String,
    #[serde(alias = "databaseid")]
    pub database_id: String,
    #[serde(alias = "collectionid")]
    pub collection_id: String,
    #[serde(alias = "apikey")]
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
        }
    }
}

/// Which search-count backend the config selects.
#[derive(Debug, Clone)]
pub enum PersistenceBackend {
    Appwrite(AppwriteConfig),
    Sqlite(SqliteConfig),
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_api_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_appwrite_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_trending_limit() -> usize {
    5
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_string(), e))
    }

    /// Fill in the TMDB token from the environment when the file has none,
    /// and reject a config that cannot possibly authenticate.
    pub fn resolve(self) -> Result<Self, ConfigError> {
        let env_token = std::env::var(TOKEN_ENV).ok();
        self.resolve_with(env_token)
    }

    fn resolve_with(mut self, env_token: Option<String>) -> Result<Self, ConfigError> {
        let token = self
            .tmdb
            .api_key
            .take()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_token.filter(|t| !t.trim().is_empty()))
            .ok_or(ConfigError::MissingToken)?;
        self.tmdb.api_key = Some(token.trim().to_string());

        if self.ui.trending_limit == 0 {
            return Err(ConfigError::Invalid("ui.trending_limit must be at least 1".to_string()));
        }
        if self.persistence_backend().is_none() {
            return Err(ConfigError::Invalid("no persistence backend configured".to_string()));
        }

        Ok(self)
    }

    /// The validated TMDB bearer token. Empty until `resolve` has run.
    pub fn tmdb_token(&self) -> &str {
        self.tmdb.api_key.as_deref().unwrap_or("")
    }

    /// Appwrite wins when both backends are configured.
    pub fn persistence_backend(&self) -> Option<PersistenceBackend> {
        if let Some(ref appwrite) = self.persistence.appwrite {
            return Some(PersistenceBackend::Appwrite(appwrite.clone()));
        }
        self.persistence
            .sqlite
            .as_ref()
            .map(|s| PersistenceBackend::Sqlite(s.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
    #[error("No TMDB API token configured (set tmdb.api_key or {})", TOKEN_ENV)]
    MissingToken,
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
