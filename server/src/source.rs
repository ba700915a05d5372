//! Weather provider seam.
//!
//! A region batch is one attempt per city. Cities whose fetch fails are
//! logged and dropped, the rest of the batch goes through.

use futures::future::{join_all, BoxFuture};
use shared::{CityLocation, WeatherReading};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider answered with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid observation time: {0}")]
    Timestamp(String),

    #[error("invalid value for '{field}': {value}")]
    Invalid { field: &'static str, value: f64 },
}

pub trait WeatherSource: Send + Sync {
    fn fetch_one<'a>(
        &'a self,
        city: &'a CityLocation,
    ) -> BoxFuture<'a, Result<WeatherReading, FetchError>>;
}

/// Fetch every city concurrently and keep the successful readings.
pub async fn fetch_region<S>(source: &S, cities: &[CityLocation]) -> Vec<WeatherReading>
where
    S: WeatherSource + ?Sized,
{
    let results = join_all(cities.iter().map(|city| source.fetch_one(city))).await;

    let readings: Vec<WeatherReading> = cities
        .iter()
        .zip(results)
        .filter_map(|(city, result)| match result {
            Ok(reading) => Some(reading),
            Err(e) => {
                log::warn!("Dropping {} from batch: {}", city.name, e);
                None
            }
        })
        .collect();

    log::info!("Fetched {}/{} cities", readings.len(), cities.len());
    readings
}
