use crate::cache;
use crate::error::{AppError, Result};
use crate::models::route::{LoopRouteRequest, RouteResponse};
use crate::models::RouteVariants;
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /routes/loop
/// Generate loop variants that start and end at the requested center
pub async fn create_loop_route(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoopRouteRequest>,
) -> Result<Json<RouteResponse>> {
    request
        .validate(state.route_generator.max_target_km())
        .map_err(AppError::InvalidRequest)?;

    tracing::info!(
        lat = request.center.lat,
        lng = request.center.lng,
        distance_km = request.distance_km,
        profile = %state.profile.ors_profile(),
        "Loop route request: ({:.4}, {:.4}), {:.1}km, profile={}",
        request.center.lat, request.center.lng,
        request.distance_km, state.profile.ors_profile()
    );

    let cache_key = cache::loop_route_cache_key(
        &request.center,
        request.distance_km,
        state.profile.ors_profile(),
    );

    // Check cache first
    if let Some(ref cache) = state.cache {
        if let Some(cached_routes) = cache.get_cached_routes(&cache_key).await {
            tracing::info!(
                "Cache hit for loop route: {} routes returned",
                cached_routes.len()
            );
            return Ok(Json(RouteVariants::new(cached_routes).into()));
        }
    }

    let variants = state
        .route_generator
        .generate_variants(request.center, request.distance_km)
        .await?;

    if let Some(ref cache) = state.cache {
        cache.cache_routes(&cache_key, &variants.routes).await;
    }

    Ok(Json(variants.into()))
}
