use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryWithChildrenDto;
use crate::features::categories::models::{Category, Subcategory};

/// Service for category reference data
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories, each with its subcategories, both name-ordered
    pub async fn list_with_children(&self) -> Result<Vec<CategoryWithChildrenDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, slug, created_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        let subcategories = sqlx::query_as::<_, Subcategory>(
            r#"
            SELECT id, category_id, name, slug, created_at
            FROM subcategories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list subcategories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(CategoryWithChildrenDto::group(categories, subcategories))
    }
}
