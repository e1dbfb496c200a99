use crate::constants::DEFAULT_ORS_BASE_URL;
use crate::error::{AppError, Result};
use crate::models::{GeoPoint, TransportProfile};
use crate::services::routing_service::{
    DirectionsProvider, DirectionsRoute, RoadSnapper, SnappedLocation,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the OpenRouteService snap and directions endpoints.
///
/// Holds no per-call state, so one instance can serve concurrent searches.
#[derive(Clone)]
pub struct OpenRouteServiceClient {
    client: Client,
    api_key: String,
    base_url: String,
    profile: TransportProfile,
}

impl OpenRouteServiceClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Self::with_config(
            api_key,
            DEFAULT_ORS_BASE_URL.to_string(),
            TransportProfile::default(),
            timeout,
        )
    }

    pub fn with_config(
        api_key: String,
        base_url: String,
        profile: TransportProfile,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(OpenRouteServiceClient {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            profile,
        })
    }

    pub fn profile(&self) -> &TransportProfile {
        &self.profile
    }

    fn endpoint(&self, service: &str) -> String {
        format!(
            "{}/v2/{}/{}",
            self.base_url,
            service,
            self.profile.ors_profile()
        )
    }

    async fn post<B, T>(&self, service: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(service))
            .header("Authorization", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::RoutingApi(format!("{} request timed out", service))
                } else {
                    AppError::RoutingApi(format!("{} request failed: {}", service, e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                service = service,
                "OpenRouteService {} HTTP error {}: {}",
                service, status, error_text
            );
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(AppError::RateLimited(format!("{}: {}", service, error_text)));
            }
            return Err(AppError::RoutingApi(format!(
                "{} HTTP {}: {}",
                service, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::RoutingApi(format!("Failed to parse {} response: {}", service, e)))
    }
}

#[async_trait]
impl RoadSnapper for OpenRouteServiceClient {
    async fn snap(
        &self,
        locations: &[GeoPoint],
        radius_m: u32,
    ) -> Result<Vec<Option<SnappedLocation>>> {
        let request = SnapRequest {
            locations: locations.iter().map(|p| p.to_lng_lat()).collect(),
            radius: radius_m,
        };

        tracing::debug!(
            locations = locations.len(),
            radius_m = radius_m,
            profile = %self.profile.ors_profile(),
            "Snap request: {} locations within {}m",
            locations.len(), radius_m
        );

        let response: SnapApiResponse = self.post("snap", &request).await?;

        if response.locations.len() != locations.len() {
            return Err(AppError::RoutingApi(format!(
                "snap returned {} locations for {} inputs",
                response.locations.len(),
                locations.len()
            )));
        }

        response
            .locations
            .into_iter()
            .map(|entry| entry.map(SnapApiLocation::into_snapped).transpose())
            .collect()
    }
}

#[async_trait]
impl DirectionsProvider for OpenRouteServiceClient {
    async fn directions(&self, waypoints: &[GeoPoint]) -> Result<Vec<DirectionsRoute>> {
        if waypoints.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 waypoints required".to_string(),
            ));
        }

        let request = DirectionsRequest {
            coordinates: waypoints.iter().map(|p| p.to_lng_lat()).collect(),
        };

        tracing::debug!(
            waypoints = waypoints.len(),
            profile = %self.profile.ors_profile(),
            "Directions request: {} waypoints, profile {}",
            waypoints.len(), self.profile.ors_profile()
        );

        let response: DirectionsApiResponse = self.post("directions", &request).await?;

        if let Some(route) = response.routes.first() {
            tracing::debug!(
                distance_km = %format!("{:.2}", route.summary.distance / 1000.0),
                candidates = response.routes.len(),
                "Directions response: {:.2}km first of {} candidates",
                route.summary.distance / 1000.0, response.routes.len()
            );
        }

        Ok(response
            .routes
            .into_iter()
            .map(|route| DirectionsRoute {
                distance_meters: route.summary.distance,
                duration_seconds: route.summary.duration,
                geometry: route.geometry,
            })
            .collect())
    }
}

// OpenRouteService wire types

#[derive(Debug, Serialize)]
struct SnapRequest {
    locations: Vec<[f64; 2]>, // [lng, lat] pairs
    radius: u32,
}

#[derive(Debug, Deserialize)]
struct SnapApiResponse {
    locations: Vec<Option<SnapApiLocation>>,
}

#[derive(Debug, Deserialize)]
struct SnapApiLocation {
    location: [f64; 2],
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    snapped_distance: f64,
}

impl SnapApiLocation {
    fn into_snapped(self) -> Result<SnappedLocation> {
        let location = GeoPoint::from_lng_lat(self.location).map_err(AppError::RoutingApi)?;
        Ok(SnappedLocation {
            location,
            road_name: self.name.filter(|n| !n.is_empty()),
            snapped_distance_m: self.snapped_distance,
        })
    }
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct DirectionsApiResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    summary: OrsSummary,
    geometry: String, // encoded polyline
}

// ORS omits zero-valued summary fields
#[derive(Debug, Deserialize)]
struct OrsSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base_url: &str) -> OpenRouteServiceClient {
        OpenRouteServiceClient::with_config(
            "test-key".to_string(),
            base_url.to_string(),
            TransportProfile::Foot,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_new_defaults_to_public_endpoint() {
        let client = OpenRouteServiceClient::new("k".to_string(), Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("snap"),
            "https://api.openrouteservice.org/v2/snap/driving-car"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client("http://localhost:8080/ors/");
        assert_eq!(
            client.endpoint("directions"),
            "http://localhost:8080/ors/v2/directions/foot-walking"
        );
        assert_eq!(client.profile(), &TransportProfile::Foot);
    }

    #[test]
    fn test_snap_request_uses_lng_lat() {
        let request = SnapRequest {
            locations: vec![GeoPoint { lat: 59.3, lng: 18.1 }.to_lng_lat()],
            radius: 300,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"locations": [[18.1, 59.3]], "radius": 300}));
    }

    #[test]
    fn test_snap_response_with_misses() {
        let body = json!({
            "locations": [
                {"location": [18.07, 59.33], "name": "Drottninggatan", "snapped_distance": 12.4},
                null,
                {"location": [18.08, 59.34], "snapped_distance": 3.0}
            ]
        });
        let response: SnapApiResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.locations.len(), 3);
        assert!(response.locations[1].is_none());
        let first = response.locations[0].as_ref().unwrap();
        assert_eq!(first.name.as_deref(), Some("Drottninggatan"));
        assert!(response.locations[2].as_ref().unwrap().name.is_none());
    }

    #[test]
    fn test_directions_response_defaults() {
        let body = json!({
            "routes": [{"summary": {}, "geometry": "_p~iF~ps|U"}]
        });
        let response: DirectionsApiResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.routes[0].summary.distance, 0.0);

        let empty: DirectionsApiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.routes.is_empty());
    }
}
