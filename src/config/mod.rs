//! Configuration layer: typed settings with layered precedence (file → env).

use std::{num::NonZeroU64, path::Path, str::FromStr, time::Duration};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::expiration_or_default;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "techmentor";
const ENV_PREFIX: &str = "TECHMENTOR";
const DEFAULT_CACHE_MAX_CAPACITY: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Sliding expirations per cache entry kind, already defaulted.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub account_expiration: Duration,
    pub profile_expiration: Duration,
    pub categories_expiration: Duration,
    pub category_links_expiration: Duration,
    pub profile_results_expiration: Duration,
    pub max_capacity: NonZeroU64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (files → environment).
///
/// `config_file`, when given, must exist and overrides both implicit files.
pub fn load(config_file: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    cache: RawCacheSettings,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, cache } = raw;

        let logging = build_logging_settings(logging)?;
        let cache = build_cache_settings(cache)?;

        Ok(Self { logging, cache })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let max_capacity = cache
        .max_capacity
        .unwrap_or(DEFAULT_CACHE_MAX_CAPACITY);
    let max_capacity = NonZeroU64::new(max_capacity)
        .ok_or_else(|| LoadError::invalid("cache.max_capacity", "must be greater than zero"))?;

    Ok(CacheSettings {
        account_expiration: expiration(cache.account_expiration_secs),
        profile_expiration: expiration(cache.profile_expiration_secs),
        categories_expiration: expiration(cache.categories_expiration_secs),
        category_links_expiration: expiration(cache.category_links_expiration_secs),
        profile_results_expiration: expiration(cache.profile_results_expiration_secs),
        max_capacity,
    })
}

fn expiration(seconds: Option<u64>) -> Duration {
    expiration_or_default(Duration::from_secs(seconds.unwrap_or_default()))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    account_expiration_secs: Option<u64>,
    profile_expiration_secs: Option<u64>,
    categories_expiration_secs: Option<u64>,
    category_links_expiration_secs: Option<u64>,
    profile_results_expiration_secs: Option<u64>,
    max_capacity: Option<u64>,
}
