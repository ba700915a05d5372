use chrono::{FixedOffset, Timelike, Utc};
use shared::{MapStyle, Snapshot, SnapshotPipeline};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::ReadingCache;
use crate::regions;
use crate::source::{fetch_region, WeatherSource};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}

/// Cached region fetches feeding the render pipeline.
pub struct SnapshotService {
    source: Arc<dyn WeatherSource>,
    cache: ReadingCache,
    pipeline: SnapshotPipeline,
    utc_offset: FixedOffset,
}

impl SnapshotService {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        cache_ttl: Duration,
        pipeline: SnapshotPipeline,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            source,
            cache: ReadingCache::new(cache_ttl),
            pipeline,
            utc_offset,
        }
    }

    pub fn local_hour(&self) -> u32 {
        Utc::now().with_timezone(&self.utc_offset).hour()
    }

    /// Render payload for a region. `now_hour` defaults to the current local hour.
    pub async fn snapshot(
        &self,
        region_key: &str,
        style_choice: Option<MapStyle>,
        now_hour: Option<u32>,
    ) -> Result<Snapshot, ServiceError> {
        let region = regions::find(region_key)
            .ok_or_else(|| ServiceError::UnknownRegion(region_key.to_string()))?;

        let readings = self
            .cache
            .get_or_fetch(&region.key, || fetch_region(self.source.as_ref(), &region.cities))
            .await;

        let now_hour = now_hour.unwrap_or_else(|| self.local_hour());
        let snapshot = self.pipeline.run(&readings, style_choice, now_hour);
        if snapshot == Snapshot::NoData {
            log::warn!("No weather data for region {}", region.key);
        }
        Ok(snapshot)
    }

    /// Drop cached readings so the next snapshot fetches fresh ones.
    pub async fn refresh(&self, region_key: &str) -> Result<(), ServiceError> {
        let region = regions::find(region_key)
            .ok_or_else(|| ServiceError::UnknownRegion(region_key.to_string()))?;

        let dropped = self.cache.invalidate(&region.key).await;
        log::info!("Refresh requested for {} (cached: {})", region.key, dropped);
        Ok(())
    }
}
