use async_trait::async_trait;
use ringroute::error::{AppError, Result};
use ringroute::models::{GeoPoint, Route};
use ringroute::services::polyline;
use ringroute::services::route_generator::route_builder::LoopBuilder;
use ringroute::services::routing_service::{
    DirectionsProvider, DirectionsRoute, RoadSnapper, SnappedLocation,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stockholm city center
#[allow(dead_code)]
pub fn test_center() -> GeoPoint {
    GeoPoint::new(59.3293, 18.0686).unwrap()
}

/// Loop builder whose routed distance is a pure function of the ring span.
#[allow(dead_code)]
pub struct ScriptedBuilder {
    distance_for_span: Box<dyn Fn(f64) -> f64 + Send + Sync>,
    fail_on_call: Option<usize>,
    calls: AtomicUsize,
    spans: Mutex<Vec<f64>>,
}

#[allow(dead_code)]
impl ScriptedBuilder {
    pub fn new(distance_for_span: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        ScriptedBuilder {
            distance_for_span: Box::new(distance_for_span),
            fail_on_call: None,
            calls: AtomicUsize::new(0),
            spans: Mutex::new(Vec::new()),
        }
    }

    /// Fail with a routing service error on the given 1-based call
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn spans(&self) -> Vec<f64> {
        self.spans.lock().unwrap().clone()
    }
}

#[async_trait]
impl LoopBuilder for ScriptedBuilder {
    async fn build_loop(&self, center: GeoPoint, span_km: f64, arc_degrees: f64) -> Result<Route> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.spans.lock().unwrap().push(span_km);

        if self.fail_on_call == Some(call) {
            return Err(AppError::RoutingApi("HTTP 503: upstream down".to_string()));
        }

        let distance_km = (self.distance_for_span)(span_km);
        Ok(Route::new(
            distance_km,
            (distance_km * 6.0) as u32,
            arc_degrees,
            vec![center, center],
            vec![center, center],
        ))
    }
}

/// Snapper that returns every input unchanged except the configured misses.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockSnapper {
    misses: HashSet<usize>,
    keep_only: Option<usize>,
    fail: bool,
    calls: AtomicUsize,
    last_radius: Mutex<Option<u32>>,
    last_input: Mutex<Vec<GeoPoint>>,
}

#[allow(dead_code)]
impl MockSnapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(indices: &[usize]) -> Self {
        MockSnapper {
            misses: indices.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Only the input at `index` snaps; every other input misses
    pub fn keeping_only(index: usize) -> Self {
        MockSnapper {
            keep_only: Some(index),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        MockSnapper {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_radius(&self) -> Option<u32> {
        *self.last_radius.lock().unwrap()
    }

    pub fn last_input(&self) -> Vec<GeoPoint> {
        self.last_input.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoadSnapper for MockSnapper {
    async fn snap(
        &self,
        locations: &[GeoPoint],
        radius_m: u32,
    ) -> Result<Vec<Option<SnappedLocation>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_radius.lock().unwrap() = Some(radius_m);
        *self.last_input.lock().unwrap() = locations.to_vec();

        if self.fail {
            return Err(AppError::RoutingApi("snap HTTP 500: boom".to_string()));
        }

        Ok(locations
            .iter()
            .enumerate()
            .map(|(i, location)| {
                let hit = match self.keep_only {
                    Some(keep) => i == keep,
                    None => !self.misses.contains(&i),
                };
                hit.then(|| SnappedLocation {
                    location: *location,
                    road_name: Some(format!("Road {}", i)),
                    snapped_distance_m: 5.0,
                })
            })
            .collect())
    }
}

#[allow(dead_code)]
pub enum DirectionsBehaviour {
    /// Route along the waypoints, distance = perimeter × factor
    Perimeter { road_factor: f64 },
    NoRoutes,
    Geometry(String),
    RateLimited,
}

/// Directions service that routes straight between waypoints.
#[allow(dead_code)]
pub struct MockDirections {
    behaviour: DirectionsBehaviour,
    calls: AtomicUsize,
    last_waypoints: Mutex<Vec<GeoPoint>>,
}

#[allow(dead_code)]
impl MockDirections {
    pub fn new(behaviour: DirectionsBehaviour) -> Self {
        MockDirections {
            behaviour,
            calls: AtomicUsize::new(0),
            last_waypoints: Mutex::new(Vec::new()),
        }
    }

    pub fn perimeter(road_factor: f64) -> Self {
        Self::new(DirectionsBehaviour::Perimeter { road_factor })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_waypoints(&self) -> Vec<GeoPoint> {
        self.last_waypoints.lock().unwrap().clone()
    }
}

/// Straight-line length of a path in kilometers
#[allow(dead_code)]
pub fn path_length_km(path: &[GeoPoint]) -> f64 {
    path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

#[async_trait]
impl DirectionsProvider for MockDirections {
    async fn directions(&self, waypoints: &[GeoPoint]) -> Result<Vec<DirectionsRoute>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_waypoints.lock().unwrap() = waypoints.to_vec();

        match &self.behaviour {
            DirectionsBehaviour::Perimeter { road_factor } => {
                let distance_km = path_length_km(waypoints) * road_factor;
                Ok(vec![
                    DirectionsRoute {
                        distance_meters: distance_km * 1000.0,
                        duration_seconds: distance_km * 360.0,
                        geometry: polyline::encode(waypoints),
                    },
                    // A worse alternative the pipeline must ignore
                    DirectionsRoute {
                        distance_meters: distance_km * 2000.0,
                        duration_seconds: distance_km * 720.0,
                        geometry: polyline::encode(waypoints),
                    },
                ])
            }
            DirectionsBehaviour::NoRoutes => Ok(vec![]),
            DirectionsBehaviour::Geometry(geometry) => Ok(vec![DirectionsRoute {
                distance_meters: 4200.0,
                duration_seconds: 600.0,
                geometry: geometry.clone(),
            }]),
            DirectionsBehaviour::RateLimited => Err(AppError::RateLimited(
                "directions: Rate limit exceeded".to_string(),
            )),
        }
    }
}

/// Snapper + directions pair wired as trait objects
#[allow(dead_code)]
pub fn services(
    snapper: MockSnapper,
    directions: MockDirections,
) -> (Arc<MockSnapper>, Arc<MockDirections>) {
    (Arc::new(snapper), Arc::new(directions))
}

/// Check if we should skip live OpenRouteService tests
#[allow(dead_code)]
pub fn live_api_key() -> Option<String> {
    std::env::var("ORS_API_KEY").ok().filter(|k| !k.is_empty())
}
