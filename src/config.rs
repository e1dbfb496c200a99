use crate::constants::*;
use crate::models::TransportProfile;
use std::env;

/// How the variant searches of one request combine their outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VariantPolicy {
    /// The first failing variant fails the request and cancels the others
    #[default]
    AllOrNothing,
    /// Keep whichever variants succeed; fail only if none do
    BestEffort,
}

impl std::str::FromStr for VariantPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "all_or_nothing" => Ok(VariantPolicy::AllOrNothing),
            "best_effort" => Ok(VariantPolicy::BestEffort),
            _ => Err(format!(
                "Invalid variant policy: {}. Use 'all_or_nothing' or 'best_effort'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ors_api_key: String,
    pub ors_base_url: String,
    pub ors_profile: TransportProfile,
    pub request_timeout_secs: u64,
    pub route_cache_ttl: u64,
    pub search: SearchConfig,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Lower bound of the ring span bisection (km)
    pub min_radius_km: f64,

    /// Upper bound of the ring span bisection (km)
    pub max_radius_km: f64,

    /// Candidates within this distance of the target are accepted at once
    pub primary_tolerance_km: f64,

    /// Search radius handed to the road-snapping service (meters)
    pub snap_radius_m: u32,

    /// Arc spans (degrees) searched concurrently, in response order
    pub arc_spans: Vec<f64>,

    pub variant_policy: VariantPolicy,

    /// Largest target distance a request may ask for (km)
    pub max_target_km: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_radius_km: DEFAULT_MIN_SEARCH_RADIUS_KM,
            max_radius_km: DEFAULT_MAX_SEARCH_RADIUS_KM,
            primary_tolerance_km: DEFAULT_PRIMARY_TOLERANCE_KM,
            snap_radius_m: DEFAULT_SNAP_RADIUS_METERS,
            arc_spans: DEFAULT_ARC_SPANS.to_vec(),
            variant_policy: VariantPolicy::default(),
            max_target_km: DEFAULT_MAX_TARGET_DISTANCE_KM,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            min_radius_km: env::var("SEARCH_MIN_RADIUS_KM")
                .unwrap_or_else(|_| defaults.min_radius_km.to_string())
                .parse()
                .map_err(|_| "Invalid SEARCH_MIN_RADIUS_KM")?,

            max_radius_km: env::var("SEARCH_MAX_RADIUS_KM")
                .unwrap_or_else(|_| defaults.max_radius_km.to_string())
                .parse()
                .map_err(|_| "Invalid SEARCH_MAX_RADIUS_KM")?,

            primary_tolerance_km: env::var("SEARCH_PRIMARY_TOLERANCE_KM")
                .unwrap_or_else(|_| defaults.primary_tolerance_km.to_string())
                .parse()
                .map_err(|_| "Invalid SEARCH_PRIMARY_TOLERANCE_KM")?,

            snap_radius_m: env::var("SEARCH_SNAP_RADIUS_M")
                .unwrap_or_else(|_| defaults.snap_radius_m.to_string())
                .parse()
                .map_err(|_| "Invalid SEARCH_SNAP_RADIUS_M")?,

            arc_spans: match env::var("ROUTE_ARC_SPANS") {
                Ok(raw) => parse_arc_spans(&raw)?,
                Err(_) => defaults.arc_spans,
            },

            variant_policy: env::var("ROUTE_VARIANT_POLICY")
                .unwrap_or_else(|_| "all_or_nothing".to_string())
                .parse()?,

            max_target_km: env::var("ROUTE_MAX_TARGET_KM")
                .unwrap_or_else(|_| defaults.max_target_km.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_MAX_TARGET_KM")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.min_radius_km > 0.0
            && self.min_radius_km < self.max_radius_km
            && self.max_radius_km.is_finite())
        {
            return Err(
                "SEARCH_MIN_RADIUS_KM must be positive and below SEARCH_MAX_RADIUS_KM"
                    .to_string(),
            );
        }
        if !self.primary_tolerance_km.is_finite() || self.primary_tolerance_km <= 0.0 {
            return Err(
                "SEARCH_PRIMARY_TOLERANCE_KM must be a positive finite number".to_string(),
            );
        }
        if self.snap_radius_m == 0 {
            return Err("SEARCH_SNAP_RADIUS_M must be positive".to_string());
        }
        if self.arc_spans.is_empty() {
            return Err("ROUTE_ARC_SPANS must name at least one arc span".to_string());
        }
        if let Some(span) = self.arc_spans.iter().find(|s| !valid_arc_span(**s)) {
            return Err(format!(
                "ROUTE_ARC_SPANS entries must be within (0, 360], got {}",
                span
            ));
        }
        if !self.max_target_km.is_finite() || self.max_target_km <= 0.0 {
            return Err(
                "ROUTE_MAX_TARGET_KM must be a positive finite number".to_string(),
            );
        }
        Ok(())
    }
}

pub fn valid_arc_span(degrees: f64) -> bool {
    degrees > 0.0 && degrees <= FULL_CIRCLE_DEGREES
}

/// Parse a comma-separated list such as `360,270,180`
fn parse_arc_spans(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("Invalid ROUTE_ARC_SPANS entry: {}", s))
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let request_timeout_secs: u64 = env::var("ORS_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid ORS_REQUEST_TIMEOUT_SECS")?;

        if request_timeout_secs == 0 {
            return Err("ORS_REQUEST_TIMEOUT_SECS must be positive".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            ors_api_key: env::var("ORS_API_KEY").map_err(|_| "ORS_API_KEY must be set")?,
            ors_base_url: env::var("ORS_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ORS_BASE_URL.to_string()),
            ors_profile: env::var("ORS_PROFILE")
                .unwrap_or_else(|_| TransportProfile::default().ors_profile().to_string())
                .parse()?,
            request_timeout_secs,
            route_cache_ttl: env::var("ROUTE_CACHE_TTL")
                .unwrap_or_else(|_| DEFAULT_ROUTE_CACHE_TTL_SECONDS.to_string())
                .parse()
                .map_err(|_| "Invalid ROUTE_CACHE_TTL")?,
            search: SearchConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
