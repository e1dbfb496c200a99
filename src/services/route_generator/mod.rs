pub mod distance_search;
pub mod route_builder;
pub mod waypoint_ring;

use crate::config::{valid_arc_span, SearchConfig, VariantPolicy};
use crate::error::{AppError, Result};
use crate::models::{GeoPoint, Route, RouteVariants};
use crate::services::routing_service::{DirectionsProvider, RoadSnapper};
use futures::future::{join_all, try_join_all};
use std::sync::Arc;

use distance_search::DistanceMatcher;
use route_builder::{LoopBuilder, RouteBuilder};

/// Generates loop variants for a center point and a target distance.
///
/// One distance-matching search runs per configured arc span, all of them
/// concurrently on the caller's task. Dropping the returned future cancels
/// every in-flight search along with its pending collaborator call.
pub struct RouteGenerator {
    matcher: DistanceMatcher,
    arc_spans: Vec<f64>,
    variant_policy: VariantPolicy,
    max_target_km: f64,
}

impl RouteGenerator {
    pub fn new(builder: Arc<dyn LoopBuilder>, config: SearchConfig) -> Self {
        let arc_spans = config.arc_spans.clone();
        let variant_policy = config.variant_policy;
        let max_target_km = config.max_target_km;

        RouteGenerator {
            matcher: DistanceMatcher::new(builder, config),
            arc_spans,
            variant_policy,
            max_target_km,
        }
    }

    /// Wire the standard ring → snap → directions pipeline.
    pub fn with_services(
        snapper: Arc<dyn RoadSnapper>,
        directions: Arc<dyn DirectionsProvider>,
        config: SearchConfig,
    ) -> Self {
        let builder = RouteBuilder::new(snapper, directions, config.snap_radius_m);
        Self::new(Arc::new(builder), config)
    }

    pub fn max_target_km(&self) -> f64 {
        self.max_target_km
    }

    pub fn arc_spans(&self) -> &[f64] {
        &self.arc_spans
    }

    fn validate(&self, target_distance_km: f64) -> Result<()> {
        if !target_distance_km.is_finite() || target_distance_km <= 0.0 {
            return Err(AppError::InvalidRequest(format!(
                "Target distance must be positive, got {}",
                target_distance_km
            )));
        }
        if target_distance_km > self.max_target_km {
            return Err(AppError::InvalidRequest(format!(
                "Target distance {}km exceeds the {}km maximum",
                target_distance_km, self.max_target_km
            )));
        }
        if self.arc_spans.is_empty() {
            return Err(AppError::InvalidRequest(
                "No arc spans configured".to_string(),
            ));
        }
        if let Some(span) = self.arc_spans.iter().find(|s| !valid_arc_span(**s)) {
            return Err(AppError::InvalidRequest(format!(
                "Arc span must be within (0, 360] degrees, got {}",
                span
            )));
        }
        Ok(())
    }

    /// Generate one loop per arc span, in configured order.
    pub async fn generate_routes(
        &self,
        center: GeoPoint,
        target_distance_km: f64,
    ) -> Result<Vec<Route>> {
        self.validate(target_distance_km)?;

        tracing::info!(
            lat = center.lat,
            lng = center.lng,
            target_km = target_distance_km,
            variants = self.arc_spans.len(),
            "Generating {} loop variants for {:.1}km from ({:.4}, {:.4})",
            self.arc_spans.len(),
            target_distance_km,
            center.lat,
            center.lng
        );

        let searches = self
            .arc_spans
            .iter()
            .map(|&arc| self.matcher.find_route(center, target_distance_km, arc));

        let routes = match self.variant_policy {
            VariantPolicy::AllOrNothing => try_join_all(searches).await?,
            VariantPolicy::BestEffort => self.keep_successful(join_all(searches).await)?,
        };

        tracing::info!(
            count = routes.len(),
            distances = ?routes.iter().map(|r| r.distance_km).collect::<Vec<_>>(),
            "Generated {} loop variants",
            routes.len()
        );

        Ok(routes)
    }

    /// Like [`generate_routes`](Self::generate_routes), with the first variant selected.
    pub async fn generate_variants(
        &self,
        center: GeoPoint,
        target_distance_km: f64,
    ) -> Result<RouteVariants> {
        let routes = self.generate_routes(center, target_distance_km).await?;
        Ok(RouteVariants::new(routes))
    }

    fn keep_successful(&self, outcomes: Vec<Result<Route>>) -> Result<Vec<Route>> {
        let mut routes = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (arc, outcome) in self.arc_spans.iter().zip(outcomes) {
            match outcome {
                Ok(route) => routes.push(route),
                Err(e) => {
                    tracing::warn!(
                        arc_degrees = arc,
                        error = %e,
                        "Variant {} degrees failed: {}",
                        arc, e
                    );
                    failures.push(format!("{} degrees: {}", arc, e));
                }
            }
        }

        if routes.is_empty() {
            return Err(AppError::RouteGeneration(format!(
                "All {} loop variants failed ({})",
                failures.len(),
                failures.join("; ")
            )));
        }

        Ok(routes)
    }
}
