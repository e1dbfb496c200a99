use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report configuration and cache status
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {
            "profile": state.profile.ors_profile(),
            "arc_spans": state.route_generator.arc_spans(),
        }
    });

    match state.cache {
        Some(ref cache) => {
            if cache.health_check().await {
                let stats = cache.get_stats().await;
                status["checks"]["cache"] = json!({
                    "backend": cache.backend_name(),
                    "hits": stats.hits,
                    "misses": stats.misses,
                    "hit_rate": stats.hit_rate,
                });
            } else {
                status["checks"]["cache"] = json!({"error": "unreachable"});
                status["status"] = json!("degraded");
            }
        }
        None => {
            status["checks"]["cache"] = json!("disabled");
        }
    }

    Json(status)
}
