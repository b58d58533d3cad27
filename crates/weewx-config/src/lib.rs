use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: Option<String>,
    /// Fixed UTC offset of the station's calendar days, `"+HH:MM"`
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// A temperature with its unit name, e.g. `{ value = 18.0, unit = "degree_C" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseSetting {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DegreeDaysConfig {
    pub heating_base: Option<BaseSetting>,
    pub cooling_base: Option<BaseSetting>,
    pub growing_base: Option<BaseSetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub station: Option<StationConfig>,
    pub database: Option<DatabaseConfig>,
    pub degree_days: Option<DegreeDaysConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid timezone '{0}', expected +HH:MM")]
    Timezone(String),
}

impl AppConfig {
    /// Load configuration from WEEWX_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("WEEWX_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(path)
    }

    /// Load configuration from `path`; a missing file yields the defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            toml::from_str::<AppConfig>(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database.as_ref().and_then(|d| d.url.as_deref())
    }

    /// Station offset east of UTC in seconds (default 0)
    pub fn utc_offset_seconds(&self) -> Result<i32, ConfigError> {
        match self.station.as_ref().and_then(|s| s.timezone.as_deref()) {
            None => Ok(0),
            Some(tz) => parse_offset(tz).ok_or_else(|| ConfigError::Timezone(tz.to_string())),
        }
    }

    pub fn degree_days(&self) -> DegreeDaysConfig {
        self.degree_days.clone().unwrap_or_default()
    }
}

fn parse_offset(tz: &str) -> Option<i32> {
    let (sign, rest) = match tz.as_bytes().first()? {
        b'+' => (1, &tz[1..]),
        b'-' => (-1, &tz[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':')?;
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || minutes >= 60 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}
