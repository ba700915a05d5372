//! Open-Meteo current conditions client.

use chrono::NaiveDateTime;
use futures::future::BoxFuture;
use serde::Deserialize;
use shared::{CityLocation, WeatherReading};
use std::time::Duration;

use crate::source::{FetchError, WeatherSource};

/// Fields requested from the `current` block.
pub const CURRENT_FIELDS: [&str; 4] = [
    "temperature_2m",
    "precipitation",
    "wind_speed_10m",
    "wind_direction_10m",
];

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub struct OpenMeteoSource {
    client: reqwest::Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoSource {
    pub fn new(base_url: &str, timezone: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            timezone: timezone.to_string(),
        })
    }

    /// Example: `https://api.open-meteo.com/v1/forecast?latitude=35.6895&longitude=139.6917&current=temperature_2m,precipitation,wind_speed_10m,wind_direction_10m&timezone=Asia/Tokyo`
    pub fn build_url(&self, city: &CityLocation) -> String {
        format!(
            "{}?latitude={}&longitude={}&current={}&timezone={}",
            self.base_url,
            city.position.lat,
            city.position.lng,
            CURRENT_FIELDS.join(","),
            self.timezone
        )
    }

    async fn fetch(&self, city: &CityLocation) -> Result<WeatherReading, FetchError> {
        let url = self.build_url(city);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_current(city, &body)
    }
}

impl WeatherSource for OpenMeteoSource {
    fn fetch_one<'a>(
        &'a self,
        city: &'a CityLocation,
    ) -> BoxFuture<'a, Result<WeatherReading, FetchError>> {
        Box::pin(self.fetch(city))
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    time: String,
    temperature_2m: f64,
    precipitation: f64,
    wind_speed_10m: f64,
    wind_direction_10m: f64,
}

/// Turn a forecast response body into a reading, rejecting anything malformed
/// so the encoder only ever sees well-formed values.
pub fn parse_current(city: &CityLocation, body: &str) -> Result<WeatherReading, FetchError> {
    let current = serde_json::from_str::<ForecastResponse>(body)?.current;

    let observed_at = NaiveDateTime::parse_from_str(&current.time, TIME_FORMAT)
        .map_err(|_| FetchError::Timestamp(current.time.clone()))?;

    for (field, value) in [
        ("temperature_2m", current.temperature_2m),
        ("precipitation", current.precipitation),
        ("wind_speed_10m", current.wind_speed_10m),
        ("wind_direction_10m", current.wind_direction_10m),
    ] {
        if !value.is_finite() {
            return Err(FetchError::Invalid { field, value });
        }
    }
    if current.precipitation < 0.0 {
        return Err(FetchError::Invalid {
            field: "precipitation",
            value: current.precipitation,
        });
    }
    if current.wind_speed_10m < 0.0 {
        return Err(FetchError::Invalid {
            field: "wind_speed_10m",
            value: current.wind_speed_10m,
        });
    }

    Ok(WeatherReading {
        city: city.clone(),
        temperature: current.temperature_2m,
        precipitation: current.precipitation,
        wind_speed: current.wind_speed_10m,
        wind_direction: current.wind_direction_10m.rem_euclid(360.0),
        observed_at,
    })
}
