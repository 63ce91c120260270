use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::categories::dtos::CategoryWithChildrenDto;
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// List all categories with their subcategories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories with subcategories", body = ApiResponse<Vec<CategoryWithChildrenDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryWithChildrenDto>>>> {
    let categories = service.list_with_children().await?;
    Ok(Json(ApiResponse::success(Some(categories), None, None)))
}
