use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::time::Duration;

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// IANA timezone sent to the provider, observation times come back in it.
    /// Must agree with `utc_offset_secs`; change both together.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Offset used to derive the local hour for day/night basemaps.
    /// Must match the current offset of `timezone`.
    #[serde(default = "default_utc_offset_secs")]
    pub utc_offset_secs: i32,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_provider_url() -> String {
    OPEN_METEO_URL.to_string()
}

fn default_timezone() -> String {
    "Asia/Tokyo".to_string()
}

fn default_utc_offset_secs() -> i32 {
    9 * 3600
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn utc_offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_secs)
            .ok_or_else(|| anyhow!("UTC offset out of range: {}s", self.utc_offset_secs))
    }

    /// Reject values that would only show up as wrong output later.
    pub fn validate(self) -> Result<Self> {
        let offset = self.utc_offset()?;
        if matches!(self.timezone.as_str(), "UTC" | "GMT" | "Etc/UTC")
            && offset.local_minus_utc() != 0
        {
            return Err(anyhow!(
                "timezone {} disagrees with UTC offset {}s",
                self.timezone,
                self.utc_offset_secs
            ));
        }
        Ok(self)
    }

    pub fn from_env() -> Result<Self> {
        envy::prefixed("WEATHERMAP_").from_env::<Config>()?.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider_url: default_provider_url(),
            timezone: default_timezone(),
            utc_offset_secs: default_utc_offset_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::from_env().expect("Invalid config. Optional env vars: WEATHERMAP_PROVIDER_URL, WEATHERMAP_TIMEZONE, WEATHERMAP_UTC_OFFSET_SECS, WEATHERMAP_CACHE_TTL_SECS, WEATHERMAP_REQUEST_TIMEOUT_SECS")
});

pub fn config() -> &'static Config {
    &CONFIG
}
