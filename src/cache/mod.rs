mod memory;

pub use memory::MemoryCacheService;

use crate::constants::CACHE_CENTER_DECIMALS;
use crate::models::{GeoPoint, Route};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Process-local memo of generated loop variants.
///
/// Lookups are best effort: a failing backend behaves like a miss and never
/// fails the request.
#[async_trait]
pub trait RouteCache: Send + Sync {
    async fn get_cached_routes(&self, key: &str) -> Option<Vec<Route>>;
    async fn cache_routes(&self, key: &str, routes: &[Route]);
    async fn get_stats(&self) -> CacheStats;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Generate a cache key for loop routes
/// Key includes: center (3 decimal precision, ~100m), exact target distance, profile
pub fn loop_route_cache_key(center: &GeoPoint, distance_km: f64, profile: &str) -> String {
    let mut hasher = DefaultHasher::new();

    let center = center.round(CACHE_CENTER_DECIMALS);
    center.lat.to_bits().hash(&mut hasher);
    center.lng.to_bits().hash(&mut hasher);
    // Cached variants were only matched against this exact target
    distance_km.to_bits().hash(&mut hasher);
    profile.hash(&mut hasher);

    format!("route:loop:{:x}", hasher.finish())
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}
