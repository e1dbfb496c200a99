use super::waypoint_ring;
use crate::constants::MIN_ROUTABLE_WAYPOINTS;
use crate::error::{AppError, Result};
use crate::models::{GeoPoint, Route};
use crate::services::polyline;
use crate::services::routing_service::{DirectionsProvider, RoadSnapper};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Builds one candidate loop for a given ring span.
#[async_trait]
pub trait LoopBuilder: Send + Sync {
    async fn build_loop(&self, center: GeoPoint, span_km: f64, arc_degrees: f64) -> Result<Route>;
}

/// Ring → snap → directions → decode.
///
/// Every collaborator failure is returned as is; nothing is retried here.
pub struct RouteBuilder {
    snapper: Arc<dyn RoadSnapper>,
    directions: Arc<dyn DirectionsProvider>,
    snap_radius_m: u32,
}

impl RouteBuilder {
    pub fn new(
        snapper: Arc<dyn RoadSnapper>,
        directions: Arc<dyn DirectionsProvider>,
        snap_radius_m: u32,
    ) -> Self {
        RouteBuilder {
            snapper,
            directions,
            snap_radius_m,
        }
    }

    /// Start → ring → start
    fn build_loop_waypoints(center: &GeoPoint, ring: Vec<GeoPoint>) -> Vec<GeoPoint> {
        let mut waypoints = Vec::with_capacity(ring.len() + 2);
        waypoints.push(*center);
        waypoints.extend(ring);
        waypoints.push(*center);
        waypoints
    }

    async fn snap_waypoints(&self, waypoints: &[GeoPoint]) -> Result<Vec<GeoPoint>> {
        let snapped = self.snapper.snap(waypoints, self.snap_radius_m).await?;

        let snapped_waypoints: Vec<GeoPoint> = snapped
            .into_iter()
            .flatten()
            .map(|s| s.location)
            .collect();

        let dropped = waypoints.len() - snapped_waypoints.len();
        if dropped > 0 {
            tracing::debug!(
                dropped = dropped,
                kept = snapped_waypoints.len(),
                "{} waypoints had no road within {}m, dropped",
                dropped,
                self.snap_radius_m
            );
        }

        if snapped_waypoints.len() < MIN_ROUTABLE_WAYPOINTS {
            return Err(AppError::RouteGeneration(format!(
                "Only {} of {} waypoints snapped to a road, need at least {}",
                snapped_waypoints.len(),
                waypoints.len(),
                MIN_ROUTABLE_WAYPOINTS
            )));
        }

        Ok(snapped_waypoints)
    }
}

#[async_trait]
impl LoopBuilder for RouteBuilder {
    #[instrument(skip(self, center), fields(span_km = %format!("{:.3}", span_km)))]
    async fn build_loop(&self, center: GeoPoint, span_km: f64, arc_degrees: f64) -> Result<Route> {
        let ring = waypoint_ring::generate_ring(&center, span_km, arc_degrees, 0.0);
        let waypoints = Self::build_loop_waypoints(&center, ring);
        tracing::debug!(
            "Generated {} waypoints for span {:.2}km ({} degrees)",
            waypoints.len(),
            span_km,
            arc_degrees
        );

        let snapped_waypoints = self.snap_waypoints(&waypoints).await?;

        let candidates = self.directions.directions(&snapped_waypoints).await?;
        let first = candidates.into_iter().next().ok_or_else(|| {
            AppError::RoutingApi("No routes returned for loop waypoints".to_string())
        })?;

        let path = polyline::decode(&first.geometry)?;
        if path.is_empty() {
            return Err(AppError::RoutingApi(
                "Directions returned an empty route geometry".to_string(),
            ));
        }

        tracing::debug!(
            distance_km = %format!("{:.2}", first.distance_km()),
            path_points = path.len(),
            "Built loop: {:.2}km, {} path points",
            first.distance_km(),
            path.len()
        );

        Ok(Route::new(
            first.distance_km(),
            first.duration_minutes(),
            arc_degrees,
            snapped_waypoints,
            path,
        ))
    }
}
