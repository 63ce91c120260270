use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Draft => write!(f, "draft"),
            ProductStatus::Published => write!(f, "published"),
            ProductStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub status: ProductStatus,
    pub inventory: Option<i32>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub hs_code: Option<String>,
    pub image_url: Option<String>,
    pub moq: Option<i32>,
    pub cartons_per_moq: Option<i32>,
    pub pallets_per_moq: Option<i32>,
    pub containers_20ft_per_moq: Option<i32>,
    pub containers_40ft_per_moq: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Storage-record shape for product writes.
///
/// Price and currency here are already flattened from the primary
/// incoterm quote; the form shape never reaches the service layer.
#[derive(Debug, Clone)]
pub struct ProductRecordInput {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub currency: String,
    pub status: ProductStatus,
    pub inventory: Option<i32>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub hs_code: Option<String>,
    pub image_url: Option<String>,
    pub moq: Option<i32>,
    pub cartons_per_moq: Option<i32>,
    pub pallets_per_moq: Option<i32>,
    pub containers_20ft_per_moq: Option<i32>,
    pub containers_40ft_per_moq: Option<i32>,
}
