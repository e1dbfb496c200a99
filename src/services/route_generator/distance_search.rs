use super::route_builder::LoopBuilder;
use crate::config::SearchConfig;
use crate::constants::*;
use crate::error::Result;
use crate::models::{GeoPoint, Route};
use std::sync::Arc;
use tracing::instrument;

/// Bisects the ring span until the routed distance matches a target.
///
/// Routed distance grows with ring span but noisily, so the search keeps the
/// closest candidate seen and bounds the number of pipeline calls.
pub struct DistanceMatcher {
    builder: Arc<dyn LoopBuilder>,
    config: SearchConfig,
}

/// Per-call bisection state.
struct SearchState {
    min_radius: f64,
    max_radius: f64,
    attempt: usize,
    max_attempts: usize,
    attempts_doubled: bool,
    best_route: Option<Route>,
    best_abs_diff: f64,
}

impl SearchState {
    fn new(min_radius: f64, max_radius: f64, max_attempts: usize) -> Self {
        SearchState {
            min_radius,
            max_radius,
            attempt: 0,
            max_attempts,
            attempts_doubled: false,
            best_route: None,
            best_abs_diff: f64::INFINITY,
        }
    }

    fn mid_radius(&self) -> f64 {
        (self.min_radius + self.max_radius) / 2.0
    }

    fn is_last_attempt(&self) -> bool {
        self.attempt + 1 >= self.max_attempts
    }

    fn record(&mut self, route: Route, abs_diff: f64) {
        if abs_diff < self.best_abs_diff {
            self.best_abs_diff = abs_diff;
            self.best_route = Some(route);
        }
    }
}

/// Pipeline calls allowed before the one-time extension.
pub fn attempt_budget(target_km: f64) -> usize {
    if target_km < 5.0 {
        5
    } else if target_km < 15.0 {
        7
    } else {
        10
    }
}

/// Fallback acceptance band, only honoured before the budget is extended.
pub fn secondary_tolerance(target_km: f64) -> f64 {
    if target_km >= SECONDARY_TOLERANCE_PCT_THRESHOLD_KM {
        SECONDARY_TOLERANCE_FLOOR_KM.max(target_km * SECONDARY_TOLERANCE_PCT)
    } else {
        SECONDARY_TOLERANCE_FLOOR_KM
    }
}

impl DistanceMatcher {
    pub fn new(builder: Arc<dyn LoopBuilder>, config: SearchConfig) -> Self {
        DistanceMatcher { builder, config }
    }

    /// Find the loop whose routed distance best matches `target_km`.
    ///
    /// Exhausting the budget is not an error: the closest candidate is
    /// returned. Any pipeline failure aborts the search immediately.
    #[instrument(skip(self, center), fields(target_km = %format!("{:.2}", target_km)))]
    pub async fn find_route(
        &self,
        center: GeoPoint,
        target_km: f64,
        arc_degrees: f64,
    ) -> Result<Route> {
        let primary = self.config.primary_tolerance_km;
        let secondary = secondary_tolerance(target_km);
        let mut state = SearchState::new(
            self.config.min_radius_km,
            self.config.max_radius_km,
            attempt_budget(target_km),
        );

        while state.attempt < state.max_attempts {
            let mid_radius = state.mid_radius();
            let route = self
                .builder
                .build_loop(center, mid_radius, arc_degrees)
                .await?;

            let actual_km = route.distance_km;
            let abs_diff = (actual_km - target_km).abs();

            tracing::info!(
                attempt = state.attempt + 1,
                max_attempts = state.max_attempts,
                span_km = %format!("{:.3}", mid_radius),
                actual_km = %format!("{:.2}", actual_km),
                "Attempt {}/{}: span {:.3}km gave {:.2}km (target {:.2}km)",
                state.attempt + 1, state.max_attempts, mid_radius, actual_km, target_km
            );

            if abs_diff <= primary {
                tracing::info!(
                    diff_km = %format!("{:.2}", abs_diff),
                    "Accepted within primary tolerance ±{:.2}km",
                    primary
                );
                return Ok(route);
            }

            if abs_diff <= secondary && !state.attempts_doubled {
                tracing::info!(
                    diff_km = %format!("{:.2}", abs_diff),
                    "Accepted within secondary tolerance ±{:.2}km",
                    secondary
                );
                return Ok(route);
            }

            state.record(route, abs_diff);

            if state.is_last_attempt() && !state.attempts_doubled {
                state.max_attempts *= 2;
                state.attempts_doubled = true;
                tracing::warn!(
                    max_attempts = state.max_attempts,
                    best_diff_km = %format!("{:.2}", state.best_abs_diff),
                    "No tolerance met, extending budget to {} attempts",
                    state.max_attempts
                );
            }

            // Keep narrowing after an extension so the extra pass probes new spans
            if actual_km < target_km {
                state.min_radius = mid_radius;
            } else {
                state.max_radius = mid_radius;
            }
            state.attempt += 1;
        }

        match state.best_route {
            Some(best) => {
                tracing::warn!(
                    best_km = %format!("{:.2}", best.distance_km),
                    "Attempt budget exhausted, returning closest route {:.2}km for {:.2}km target",
                    best.distance_km, target_km
                );
                Ok(best)
            }
            None => {
                // Only reachable with an empty budget: build once at the current midpoint
                tracing::warn!("No candidate built, falling back to a single build");
                self.builder
                    .build_loop(center, state.mid_radius(), arc_degrees)
                    .await
            }
        }
    }
}
