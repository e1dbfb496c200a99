// Library exports for testing and reusability

pub mod cache;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use cache::RouteCache;
use models::TransportProfile;
use services::route_generator::RouteGenerator;
use std::sync::Arc;

// App state for sharing across the application
pub struct AppState {
    pub route_generator: RouteGenerator,
    pub profile: TransportProfile,
    pub cache: Option<Arc<dyn RouteCache>>,
}
