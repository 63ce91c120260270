use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::products::{
    dtos as products_dtos, handlers as products_handlers, models as products_models,
};
use crate::features::profiles::{dtos as profiles_dtos, handlers as profiles_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Products (protected)
        products_handlers::list_products,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        // Categories (public)
        categories_handlers::list_categories,
        // Profiles (protected)
        profiles_handlers::get_profile,
        profiles_handlers::update_profile,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Products
            products_models::ProductStatus,
            products_models::IncotermTerm,
            products_models::IncotermCurrency,
            products_models::IncotermPort,
            products_dtos::FlexibleNumber,
            products_dtos::IncotermQuoteFormDto,
            products_dtos::ProductFormDto,
            products_dtos::IncotermQuoteResponseDto,
            products_dtos::ProductResponseDto,
            ApiResponse<Vec<products_dtos::ProductResponseDto>>,
            ApiResponse<products_dtos::ProductResponseDto>,
            // Categories
            categories_dtos::SubcategoryResponseDto,
            categories_dtos::CategoryWithChildrenDto,
            ApiResponse<Vec<categories_dtos::CategoryWithChildrenDto>>,
            // Profiles
            profiles_dtos::UpdateProfileDto,
            profiles_dtos::ProfileResponseDto,
            ApiResponse<profiles_dtos::ProfileResponseDto>,
        )
    ),
    tags(
        (name = "products", description = "Seller product management"),
        (name = "categories", description = "Product categories (public)"),
        (name = "profiles", description = "Seller profile management"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Sellerdesk API",
        version = "0.1.0",
        description = "API documentation for Sellerdesk",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
