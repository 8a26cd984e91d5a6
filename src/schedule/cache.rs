//! Time-bounded memo of loaded grids, keyed by source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;

use super::error::ScheduleError;
use super::grid::Grid;
use super::loader::GridLoader;
use super::sources::ScheduleSource;
use crate::utils::logging::{log_cache_event, log_source_error};

/// Default freshness window for a loaded workbook.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Monotonic time source, injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct CacheEntry {
    inserted_at: Instant,
    grid: Arc<Grid>,
}

/// Grids by source key. An entry is fresh for `ttl` after insertion;
/// nothing is evicted except by age.
pub struct GridCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl GridCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_system_clock(ttl: Duration) -> Self {
        Self::new(ttl, Arc::new(SystemClock))
    }

    pub fn get(&self, key: &str) -> Option<Arc<Grid>> {
        let now = self.clock.now();
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| now.duration_since(entry.inserted_at) < self.ttl)
            .map(|entry| Arc::clone(&entry.grid))
    }

    pub fn put(&self, key: impl Into<String>, grid: Arc<Grid>) {
        let entry = CacheEntry {
            inserted_at: self.clock.now(),
            grid,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Number of entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        before - entries.len()
    }
}

/// A [`GridLoader`] fronted by a [`GridCache`].
///
/// Failed loads are logged and surface as `None` so that callers can move
/// on to the next source; they are never cached. Concurrent misses on the
/// same source wait for a single load instead of each fetching it.
#[derive(Clone)]
pub struct CachedLoader {
    inner: Arc<dyn GridLoader>,
    cache: Arc<GridCache>,
    in_flight: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl CachedLoader {
    pub fn new(inner: Arc<dyn GridLoader>, cache: Arc<GridCache>) -> Self {
        Self {
            inner,
            cache,
            in_flight: Arc::default(),
        }
    }

    pub fn cache(&self) -> &GridCache {
        &self.cache
    }

    pub async fn get(&self, source: &ScheduleSource) -> Option<Arc<Grid>> {
        self.try_get(source).await.ok()
    }

    pub async fn try_get(&self, source: &ScheduleSource) -> Result<Arc<Grid>, ScheduleError> {
        let key = source.key();
        if let Some(grid) = self.cache.get(&key) {
            log_cache_event("hit", &key);
            return Ok(grid);
        }

        let gate = self.gate(&key);
        let result = {
            let _loading = gate.lock().await;
            // whoever held the gate before us may have filled the cache
            match self.cache.get(&key) {
                Some(grid) => {
                    log_cache_event("hit", &key);
                    Ok(grid)
                }
                None => self.load_and_store(source, &key).await,
            }
        };
        self.release_gate(&key, gate);
        result
    }

    async fn load_and_store(&self, source: &ScheduleSource, key: &str) -> Result<Arc<Grid>, ScheduleError> {
        log_cache_event("miss", key);
        match self.inner.load(source).await {
            Ok(grid) => {
                let grid = Arc::new(grid);
                self.cache.put(key, Arc::clone(&grid));
                Ok(grid)
            }
            Err(e) => {
                log_source_error(key, &e.to_string());
                Err(e)
            }
        }
    }

    fn gate(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(in_flight.entry(key.to_string()).or_default())
    }

    /// Forgets the gate once no other caller holds it.
    fn release_gate(&self, key: &str, gate: Arc<AsyncMutex<()>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // the map and `gate` itself
        if Arc::strong_count(&gate) <= 2 {
            in_flight.remove(key);
        }
    }
}
