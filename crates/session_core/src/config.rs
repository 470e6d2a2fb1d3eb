use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_SETTINGS_FILE: &str = "sommelier.toml";

/// How `is_loading` behaves when several replies are outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPolicy {
    /// Any resolved reply clears the flag, even while later replies are pending.
    #[default]
    LastReplyClears,
    /// The flag stays set until no reply is outstanding.
    Outstanding,
}

impl LoadingPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "last_reply_clears" => Some(LoadingPolicy::LastReplyClears),
            "outstanding" => Some(LoadingPolicy::Outstanding),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub reply_delay_ms: u64,
    pub recommendation_limit: usize,
    pub loading_policy: LoadingPolicy,
    pub catalog_path: Option<PathBuf>,
    pub event_buffer: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1500,
            recommendation_limit: 2,
            loading_policy: LoadingPolicy::LastReplyClears,
            catalog_path: None,
            event_buffer: 256,
        }
    }
}

impl SessionSettings {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Loads `sommelier.toml` from the working directory when present, then applies
/// `APP__*` environment overrides.
pub fn load_settings() -> Result<SessionSettings, SettingsError> {
    let default_path = Path::new(DEFAULT_SETTINGS_FILE);
    let path = default_path.exists().then_some(default_path);
    load_settings_from(path, |key| std::env::var(key).ok())
}

/// An explicit `path` must exist. `env` is consulted for overrides so callers can
/// substitute the process environment.
pub fn load_settings_from(
    path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SessionSettings, SettingsError> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None => SessionSettings::default(),
    };

    if let Some(v) = env("APP__REPLY_DELAY_MS") {
        settings.reply_delay_ms = v.trim().parse().map_err(|_| SettingsError::InvalidValue {
            key: "APP__REPLY_DELAY_MS",
            value: v.clone(),
        })?;
    }

    if let Some(v) = env("APP__RECOMMENDATION_LIMIT") {
        settings.recommendation_limit =
            v.trim().parse().map_err(|_| SettingsError::InvalidValue {
                key: "APP__RECOMMENDATION_LIMIT",
                value: v.clone(),
            })?;
    }

    if let Some(v) = env("APP__LOADING_POLICY") {
        settings.loading_policy =
            LoadingPolicy::parse(&v).ok_or_else(|| SettingsError::InvalidValue {
                key: "APP__LOADING_POLICY",
                value: v.clone(),
            })?;
    }

    if let Some(v) = env("APP__CATALOG_PATH") {
        if !v.trim().is_empty() {
            settings.catalog_path = Some(PathBuf::from(v));
        }
    }

    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<SessionSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
