use crate::cache::{CacheStats, RouteCache};
use crate::models::Route;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Process-local memo of loop variants, bounded by TTL and entry count.
pub struct MemoryCacheService {
    variants: Cache<String, Arc<[Route]>>,
    counters: LookupCounters,
}

#[derive(Default)]
struct LookupCounters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl LookupCounters {
    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 * 100.0 / lookups as f64
            },
            connected: true,
        }
    }
}

impl MemoryCacheService {
    pub fn new(ttl_seconds: u64, max_entries: u64) -> Self {
        MemoryCacheService {
            variants: Cache::builder()
                .time_to_live(Duration::from_secs(ttl_seconds))
                .max_capacity(max_entries)
                .build(),
            counters: LookupCounters::default(),
        }
    }
}

#[async_trait]
impl RouteCache for MemoryCacheService {
    async fn get_cached_routes(&self, key: &str) -> Option<Vec<Route>> {
        let cached = self.variants.get(key).await;
        self.counters.record(cached.is_some());

        match cached {
            Some(routes) => {
                tracing::debug!(key = key, variants = routes.len(), "Route cache hit");
                Some(routes.to_vec())
            }
            None => {
                tracing::debug!(key = key, "Route cache miss");
                None
            }
        }
    }

    async fn cache_routes(&self, key: &str, routes: &[Route]) {
        if routes.is_empty() {
            return;
        }
        self.variants
            .insert(key.to_string(), Arc::from(routes))
            .await;
        tracing::debug!(key = key, variants = routes.len(), "Cached loop variants");
    }

    async fn get_stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
