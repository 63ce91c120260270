use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::profiles::handlers;
use crate::features::profiles::services::ProfileService;

/// Create routes for the profiles feature
///
/// Note: All routes require authentication (applied in main router)
pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(
            "/api/profiles/me",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .with_state(service)
}
