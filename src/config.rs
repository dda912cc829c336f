use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::engine::ModelType;
use crate::error::EngineError;
use crate::openai::DEFAULT_BASE_URL;

const MAX_CONFIG_FILE_SIZE: u64 = 16 * 1024; // 16 KiB

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MODEL_ENV: &str = "GPTBOT_MODEL";
pub const TIMEOUT_ENV: &str = "GPTBOT_TIMEOUT_SECS";

// --- TOML deserialization struct (private, maps 1:1 to TOML schema) ---

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    model: String,
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Everything `build_engine` needs: model, credential, endpoint.
#[derive(Debug)]
pub struct EngineConfig {
    pub model: ModelType,
    pub base_url: String,
    pub timeout: Option<Duration>,
    api_key: Option<SecretString>,
}

impl FromStr for EngineConfig {
    type Err = EngineError;

    fn from_str(content: &str) -> Result<Self, EngineError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| EngineError::Config(e.to_string()))?;

        Ok(Self {
            model: file.model.parse()?,
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout: file.timeout_secs.map(Duration::from_secs),
            api_key: file.api_key.map(SecretString::from),
        })
    }
}

impl EngineConfig {
    pub fn new(model: ModelType, api_key: impl Into<SecretString>) -> Self {
        Self {
            model,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            api_key: Some(api_key.into()),
        }
    }

    /// Load from a TOML file. Checks file size before reading.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| EngineError::Config(format!("cannot read {}: {e}", path.display())))?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(EngineError::Config(format!(
                "config file exceeds {MAX_CONFIG_FILE_SIZE} byte limit"
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("cannot read {}: {e}", path.display())))?;

        content.parse()
    }

    /// Build from environment variables, reading `.env` first if present.
    pub fn from_env() -> Result<Self, EngineError> {
        dotenvy::dotenv().ok();

        let model = std::env::var(MODEL_ENV)
            .map_err(|_| EngineError::Config(format!("{MODEL_ENV} is not set")))?
            .parse()?;

        let timeout = match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => Some(Duration::from_secs(raw.parse().map_err(|e| {
                EngineError::Config(format!("{TIMEOUT_ENV}: {e}"))
            })?)),
            Err(_) => None,
        };

        Ok(Self {
            model,
            base_url: std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            timeout,
            api_key: std::env::var(API_KEY_ENV).ok().map(SecretString::from),
        })
    }

    /// Configured key, else `OPENAI_API_KEY`.
    pub fn resolve_api_key(&self) -> Result<SecretString, EngineError> {
        if let Some(key) = &self.api_key {
            return Ok(SecretString::from(key.expose_secret()));
        }
        std::env::var(API_KEY_ENV)
            .map(SecretString::from)
            .map_err(|_| EngineError::Config(format!("no api_key configured and {API_KEY_ENV} is not set")))
    }
}
