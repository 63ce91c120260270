#[cfg(test)]
use crate::features::auth::model::AuthenticatedSeller;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
use uuid::Uuid;

#[cfg(test)]
pub fn create_test_seller() -> AuthenticatedSeller {
    AuthenticatedSeller {
        id: Uuid::from_u128(0xA11CE),
        email: Some("seller@example.com".to_string()),
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_seller_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_seller());
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_seller_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_seller_middleware))
}
