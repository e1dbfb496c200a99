use crate::error::Result;
use crate::models::GeoPoint;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A raw coordinate moved onto the nearest routable road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnappedLocation {
    pub location: GeoPoint,
    pub road_name: Option<String>,
    /// How far the input point was moved (meters)
    pub snapped_distance_m: f64,
}

/// One candidate route returned by a directions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRoute {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Encoded polyline of the full path
    pub geometry: String,
}

impl DirectionsRoute {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.duration_seconds / 60.0).round() as u32
    }
}

#[async_trait]
pub trait RoadSnapper: Send + Sync {
    /// Snap every location to the nearest road within `radius_m`.
    ///
    /// The result has one entry per input, in order; `None` means no road was
    /// found near that input.
    async fn snap(
        &self,
        locations: &[GeoPoint],
        radius_m: u32,
    ) -> Result<Vec<Option<SnappedLocation>>>;
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Route through `waypoints` in order. An empty result is not an error here.
    async fn directions(&self, waypoints: &[GeoPoint]) -> Result<Vec<DirectionsRoute>>;
}
