use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the doctriage server.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Base URL of the object store holding uploaded binaries.
    pub object_store_url: String,
    /// Optional API key for the object store.
    pub object_store_api_key: Option<String>,
    /// Base URL of the relational data store.
    pub data_store_url: String,
    /// Optional API key for the relational data store.
    pub data_store_api_key: Option<String>,
    /// Base URL of the hosted summarization provider.
    pub summary_provider_url: Option<String>,
    /// Credential for the summarization provider. Absence is a valid
    /// configuration and switches the summarizer into fallback mode.
    pub summary_provider_api_key: Option<String>,
    /// Base URL of the OCR engine used for image extraction.
    pub ocr_url: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            object_store_url: load_env("OBJECT_STORE_URL")?,
            object_store_api_key: load_env_optional("OBJECT_STORE_API_KEY"),
            data_store_url: load_env("DATA_STORE_URL")?,
            data_store_api_key: load_env_optional("DATA_STORE_API_KEY"),
            summary_provider_url: load_env_optional("SUMMARY_PROVIDER_URL"),
            summary_provider_api_key: load_env_optional("SUMMARY_PROVIDER_API_KEY"),
            ocr_url: load_env_optional("OCR_URL"),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        object_store = %config.object_store_url,
        data_store = %config.data_store_url,
        server_port = ?config.server_port,
        provider_configured = config.summary_provider_api_key.is_some(),
        ocr_configured = config.ocr_url.is_some(),
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
