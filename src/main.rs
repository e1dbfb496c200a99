use axum::Router;
use ringroute::cache::{MemoryCacheService, RouteCache};
use ringroute::config::Config;
use ringroute::constants::DEFAULT_MEMORY_CACHE_MAX_ENTRIES;
use ringroute::services::openrouteservice::OpenRouteServiceClient;
use ringroute::services::route_generator::RouteGenerator;
use ringroute::AppState;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ringroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting RingRoute API server");
    tracing::info!(
        profile = %config.ors_profile.ors_profile(),
        arc_spans = ?config.search.arc_spans,
        policy = ?config.search.variant_policy,
        "Configuration loaded successfully"
    );

    let cache: Arc<dyn RouteCache> = Arc::new(MemoryCacheService::new(
        config.route_cache_ttl,
        DEFAULT_MEMORY_CACHE_MAX_ENTRIES,
    ));

    // One client serves both collaborator roles
    let ors_client = Arc::new(OpenRouteServiceClient::with_config(
        config.ors_api_key.clone(),
        config.ors_base_url.clone(),
        config.ors_profile.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?);
    let route_generator =
        RouteGenerator::with_services(ors_client.clone(), ors_client, config.search.clone());

    let state = Arc::new(AppState {
        route_generator,
        profile: config.ors_profile.clone(),
        cache: Some(cache),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", ringroute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
