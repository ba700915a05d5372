//! In-memory reading cache keyed by region.

use shared::WeatherReading;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct Entry {
    readings: Vec<WeatherReading>,
    fetched_at: Instant,
}

pub struct ReadingCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl ReadingCache {
    pub fn new(ttl: Duration) -> Self {
        ReadingCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Readings for `key` if they were stored less than one TTL ago.
    pub async fn get_fresh(&self, key: &str) -> Option<Vec<WeatherReading>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.readings.clone())
    }

    /// Cached readings, or the result of `fetch` once they are missing or stale.
    ///
    /// No lock is held while fetching. When two fetches race for the same key,
    /// whichever finishes last wins the entry.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Vec<WeatherReading>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<WeatherReading>>,
    {
        if let Some(readings) = self.get_fresh(key).await {
            log::debug!("Cache hit for {}", key);
            return readings;
        }

        log::debug!("Cache miss for {}", key);
        let readings = fetch().await;
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                readings: readings.clone(),
                fetched_at: Instant::now(),
            },
        );
        readings
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::CityLocation;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn readings(temperature: f64) -> Vec<WeatherReading> {
        vec![WeatherReading {
            city: CityLocation::new("Oita", 33.2381, 131.6119),
            temperature,
            precipitation: 0.0,
            wind_speed: 3.0,
            wind_direction: 10.0,
            observed_at: NaiveDate::from_ymd_opt(2024, 5, 5)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
        }]
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl() {
        let cache = ReadingCache::new(Duration::from_secs(600));
        let counter = AtomicUsize::new(0);
        let fetches = &counter;

        let first = cache
            .get_or_fetch("kyushu", || async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                readings(20.0)
            })
            .await;
        tokio::time::advance(Duration::from_secs(599)).await;
        let second = cache
            .get_or_fetch("kyushu", || async move {
                fetches.fetch_add(1, Ordering::SeqCst);
                readings(30.0)
            })
            .await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires_after_ttl() {
        let cache = ReadingCache::new(Duration::from_secs(600));
        cache.get_or_fetch("kyushu", || async { readings(20.0) }).await;

        tokio::time::advance(Duration::from_secs(600)).await;
        assert!(cache.get_fresh("kyushu").await.is_none());

        let refetched = cache.get_or_fetch("kyushu", || async { readings(21.0) }).await;
        assert_eq!(refetched[0].temperature, 21.0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_fetch() {
        let cache = ReadingCache::new(Duration::from_secs(600));
        cache.get_or_fetch("japan", || async { readings(20.0) }).await;

        assert!(cache.invalidate("japan").await);
        assert!(!cache.invalidate("japan").await);

        let refetched = cache.get_or_fetch("japan", || async { readings(5.0) }).await;
        assert_eq!(refetched[0].temperature, 5.0);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = ReadingCache::new(Duration::from_secs(600));
        cache.get_or_fetch("japan", || async { readings(20.0) }).await;

        assert!(cache.get_fresh("kyushu").await.is_none());
        cache.invalidate("kyushu").await;
        assert!(cache.get_fresh("japan").await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_racing_fetches_keep_last_finisher() {
        let cache = ReadingCache::new(Duration::from_secs(600));

        let (fast, slow) = tokio::join!(
            cache.get_or_fetch("japan", || async {
                tokio::time::sleep(Duration::from_millis(10)).await;
                readings(1.0)
            }),
            cache.get_or_fetch("japan", || async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                readings(2.0)
            }),
        );

        assert_eq!(fast[0].temperature, 1.0);
        assert_eq!(slow[0].temperature, 2.0);
        assert_eq!(cache.get_fresh("japan").await.unwrap()[0].temperature, 2.0);
    }
}
