//! Defaults and fixed coefficients for the loop generator.
//!
//! Env-tunable search knobs are read into
//! [`SearchConfig`](crate::config::SearchConfig); the values here are their
//! fallbacks plus the geometry and tolerance constants that never change.

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- OpenRouteService defaults ---

/// Public OpenRouteService endpoint. Overridden by `ORS_BASE_URL`.
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";
/// Per-request timeout for snapping and directions calls. Overridden by
/// `ORS_REQUEST_TIMEOUT_SECS`.
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// --- Cache defaults ---

/// Default route cache TTL: 1 hour. Overridden by `ROUTE_CACHE_TTL`.
pub const DEFAULT_ROUTE_CACHE_TTL_SECONDS: u64 = 3_600;
/// Maximum entries held by the in-memory route cache.
pub const DEFAULT_MEMORY_CACHE_MAX_ENTRIES: u64 = 1_000;
/// Decimal places of the center kept in route cache keys (~100 m).
pub const CACHE_CENTER_DECIMALS: u32 = 3;

// --- Ring geometry ---

/// Kilometers per degree of latitude (flat-earth approximation).
pub const KM_PER_DEGREE: f64 = 111.0;
/// A ring never has fewer points than this, whatever its arc span.
pub const MIN_RING_WAYPOINTS: usize = 3;
/// A full circle.
pub const FULL_CIRCLE_DEGREES: f64 = 360.0;

// --- Distance-matching search ---

/// Lower search bound for the ring span (km).
pub const DEFAULT_MIN_SEARCH_RADIUS_KM: f64 = 0.5;
/// Upper search bound for the ring span (km).
pub const DEFAULT_MAX_SEARCH_RADIUS_KM: f64 = 10.0;
/// Any candidate this close to the target is accepted immediately.
pub const DEFAULT_PRIMARY_TOLERANCE_KM: f64 = 0.5;
/// Floor of the secondary acceptance band.
pub const SECONDARY_TOLERANCE_FLOOR_KM: f64 = 1.0;
/// Targets at or above this switch the secondary band to a percentage.
pub const SECONDARY_TOLERANCE_PCT_THRESHOLD_KM: f64 = 20.0;
/// Secondary band as a fraction of long targets.
pub const SECONDARY_TOLERANCE_PCT: f64 = 0.05;
/// Default upper bound on requested target distances.
pub const DEFAULT_MAX_TARGET_DISTANCE_KM: f64 = 100.0;

// --- Route pipeline ---

/// Search radius (meters) handed to the road-snapping service.
pub const DEFAULT_SNAP_RADIUS_METERS: u32 = 300;
/// Fewest snapped waypoints the directions service can route between.
pub const MIN_ROUTABLE_WAYPOINTS: usize = 2;

// --- Variants ---

/// Arc spans (degrees) searched concurrently for every request.
pub const DEFAULT_ARC_SPANS: [f64; 2] = [360.0, 270.0];
