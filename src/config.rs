use crate::errors::ConfigError;
use crate::source::LogSource;
use chrono_tz::Tz;
use std::env;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SOURCE: &str = "data/log.csv";
pub const DEFAULT_REFRESH_SECS: u64 = 60;
pub const DEFAULT_TITLE: &str = "Feeding tracker";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub source: LogSource,
    pub timezone: Tz,
    pub refresh_secs: u64,
    pub reference_ml: Option<f64>,
    pub title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            source: LogSource::parse(DEFAULT_SOURCE),
            timezone: chrono_tz::Europe::Oslo,
            refresh_secs: DEFAULT_REFRESH_SECS,
            reference_ml: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Config::default();

        if let Some(value) = get("PORT") {
            config.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value.clone()))?;
        }
        if let Some(value) = get("TRACKER_SOURCE") {
            config.source = LogSource::parse(&value);
        }
        if let Some(value) = get("TRACKER_TIMEZONE") {
            config.timezone = value
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(value.clone()))?;
        }
        if let Some(value) = get("TRACKER_REFRESH_SECS") {
            config.refresh_secs = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "TRACKER_REFRESH_SECS",
                value: value.clone(),
            })?;
        }
        if let Some(value) = get("TRACKER_REFERENCE_ML") {
            let reference = value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidNumber {
                name: "TRACKER_REFERENCE_ML",
                value: value.clone(),
            })?;
            config.reference_ml = Some(reference);
        }
        if let Some(value) = get("TRACKER_TITLE") {
            config.title = value;
        }

        Ok(config)
    }
}
