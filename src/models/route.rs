use crate::models::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportProfile {
    #[default]
    Car,
    Foot,
    Bike,
}

impl TransportProfile {
    /// Returns the OpenRouteService profile name for this mode
    pub fn ors_profile(&self) -> &str {
        match self {
            TransportProfile::Car => "driving-car",
            TransportProfile::Foot => "foot-walking",
            TransportProfile::Bike => "cycling-regular",
        }
    }
}

impl fmt::Display for TransportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProfile::Car => write!(f, "car"),
            TransportProfile::Foot => write!(f, "foot"),
            TransportProfile::Bike => write!(f, "bike"),
        }
    }
}

impl FromStr for TransportProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "car" | "driving-car" | "drive" => Ok(TransportProfile::Car),
            "foot" | "foot-walking" | "walk" | "run" => Ok(TransportProfile::Foot),
            "bike" | "cycling-regular" | "cycling" => Ok(TransportProfile::Bike),
            _ => Err(format!("Invalid transport profile: '{}'", s)),
        }
    }
}

/// One loop produced by a full pipeline run.
///
/// `waypoints` starts and ends at the (snapped) center; `path` is the decoded
/// road geometry and is never empty once a route leaves the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub distance_km: f64,
    pub estimated_duration_minutes: u32,
    /// Arc span (degrees) of the ring this route was built from
    pub arc_degrees: f64,
    /// Snapped routing nodes, first and last at the start position
    pub waypoints: Vec<GeoPoint>,
    /// Detailed path decoded from the directions polyline
    pub path: Vec<GeoPoint>,
}

impl Route {
    pub fn new(
        distance_km: f64,
        estimated_duration_minutes: u32,
        arc_degrees: f64,
        waypoints: Vec<GeoPoint>,
        path: Vec<GeoPoint>,
    ) -> Self {
        Route {
            id: Uuid::new_v4(),
            distance_km,
            estimated_duration_minutes,
            arc_degrees,
            waypoints,
            path,
        }
    }
}

/// Every loop variant generated for one request, plus the one currently shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteVariants {
    pub routes: Vec<Route>,
    pub selected: usize,
}

impl RouteVariants {
    pub fn new(routes: Vec<Route>) -> Self {
        RouteVariants {
            routes,
            selected: 0,
        }
    }

    pub fn current(&self) -> Option<&Route> {
        self.routes.get(self.selected)
    }

    /// Select another variant. Out-of-range indices leave the selection as is.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index < self.routes.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct LoopRouteRequest {
    pub center: GeoPoint,
    pub distance_km: f64,
}

impl LoopRouteRequest {
    pub fn validate(&self, max_distance_km: f64) -> Result<(), String> {
        GeoPoint::new(self.center.lat, self.center.lng)?;
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err("distance_km must be a positive number".to_string());
        }
        if self.distance_km > max_distance_km {
            return Err(format!(
                "distance_km must not exceed {}",
                max_distance_km
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub routes: Vec<Route>,
    pub selected: usize,
}

impl From<RouteVariants> for RouteResponse {
    fn from(variants: RouteVariants) -> Self {
        RouteResponse {
            routes: variants.routes,
            selected: variants.selected,
        }
    }
}
