use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::profiles::dtos::UpdateProfileDto;
use crate::features::profiles::models::Profile;

const PROFILE_COLUMNS: &str =
    "id, full_name, company_name, phone, website, bio, avatar_url, created_at, updated_at";

/// Service for seller profiles
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the seller's profile
    pub async fn get(&self, seller_id: Uuid) -> Result<Profile> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(seller_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load profile {}: {:?}", seller_id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }

    /// Write the seller's profile, creating the row on first save
    pub async fn upsert(&self, seller_id: Uuid, dto: &UpdateProfileDto) -> Result<Profile> {
        sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (id, full_name, company_name, phone, website, bio, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                company_name = EXCLUDED.company_name,
                phone = EXCLUDED.phone,
                website = EXCLUDED.website,
                bio = EXCLUDED.bio,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = now()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(seller_id)
        .bind(&dto.full_name)
        .bind(&dto.company_name)
        .bind(&dto.phone)
        .bind(&dto.website)
        .bind(&dto.bio)
        .bind(&dto.avatar_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert profile {}: {:?}", seller_id, e);
            AppError::Database(e)
        })
    }
}
