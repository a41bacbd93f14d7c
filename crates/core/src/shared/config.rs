use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::infrastructure::openai_client::OpenAiSettings;
use crate::shared::constants::{
    DEFAULT_ANALYZE_MODEL, DEFAULT_OPENAI_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TRANSCRIBE_MODEL, DEFAULT_TTS_MODEL,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialise config for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Runtime configuration shared by the CLI and the use cases.
///
/// Missing keys in the config file fall back to the defaults, so a file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub openai_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    pub transcribe_model: String,
    pub analyze_model: String,
    pub tts_model: String,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            upload_dir: PathBuf::from("uploads"),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_api_key: None,
            transcribe_model: DEFAULT_TRANSCRIBE_MODEL.to_string(),
            analyze_model: DEFAULT_ANALYZE_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// `<config_dir>/OPIc Coach/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("OPIc Coach").join("config.json"))
    }

    /// Defaults, then the user config file if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Applies environment-style overrides. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("OPIC_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("OPIC_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.openai_base_url = v;
        }
        if let Some(v) = get("TRANSCRIBE_MODEL") {
            self.transcribe_model = v;
        }
        if let Some(v) = get("ANALYZE_MODEL") {
            self.analyze_model = v;
        }
        if let Some(v) = get("TTS_MODEL") {
            self.tts_model = v;
        }
        if let Some(v) = get("OPIC_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "OPIC_REQUEST_TIMEOUT_SECS".to_string(),
                value: v.clone(),
            })?;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |e| ConfigError::Write {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Provider settings; fails when no API key is configured.
    pub fn openai_settings(&self) -> Result<OpenAiSettings, ConfigError> {
        Ok(OpenAiSettings {
            base_url: self.openai_base_url.clone(),
            api_key: self.require_api_key()?.to_string(),
            transcribe_model: self.transcribe_model.clone(),
            analyze_model: self.analyze_model.clone(),
            tts_model: self.tts_model.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}
