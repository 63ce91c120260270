use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
///
/// Note: All routes require authentication (applied in main router)
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/api/products",
            get(handlers::list_products)
                .post(handlers::create_product)
                .put(handlers::update_product),
        )
        .route("/api/products/{id}", delete(handlers::delete_product))
        .with_state(service)
}
