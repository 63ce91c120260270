use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::products::dtos::{ProductResponseDto, ValidatedProductForm};
use crate::features::products::models::{IncotermQuote, IncotermQuoteInput, Product};

const PRODUCT_COLUMNS: &str = "id, seller_id, name, description, price, currency, status, \
     inventory, category_id, subcategory_id, hs_code, image_url, moq, cartons_per_moq, \
     pallets_per_moq, containers_20ft_per_moq, containers_40ft_per_moq, created_at, updated_at";

const QUOTE_COLUMNS: &str = "id, product_id, term, currency, price, port, position, created_at";

/// Service for seller product management
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List the seller's products, newest first, with quotes attached
    pub async fn list_by_seller(&self, seller_id: Uuid) -> Result<Vec<ProductResponseDto>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE seller_id = $1 ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products for seller {}: {:?}", seller_id, e);
            AppError::Database(e)
        })?;

        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let quotes = sqlx::query_as::<_, IncotermQuote>(&format!(
            "SELECT {} FROM incoterm_quotes WHERE product_id = ANY($1) ORDER BY position",
            QUOTE_COLUMNS
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list incoterm quotes: {:?}", e);
            AppError::Database(e)
        })?;

        let mut by_product: HashMap<Uuid, Vec<IncotermQuote>> = HashMap::new();
        for quote in quotes {
            by_product.entry(quote.product_id).or_default().push(quote);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let quotes = by_product.remove(&product.id).unwrap_or_default();
                ProductResponseDto::from_parts(product, quotes)
            })
            .collect())
    }

    /// Create a product with its quote rows in one transaction
    pub async fn create(
        &self,
        seller_id: Uuid,
        form: &ValidatedProductForm,
    ) -> Result<ProductResponseDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let record = form.to_record();
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (
                seller_id, name, description, price, currency, status, inventory,
                category_id, subcategory_id, hs_code, image_url, moq, cartons_per_moq,
                pallets_per_moq, containers_20ft_per_moq, containers_40ft_per_moq
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(seller_id)
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.price)
        .bind(&record.currency)
        .bind(record.status)
        .bind(record.inventory)
        .bind(record.category_id)
        .bind(record.subcategory_id)
        .bind(&record.hs_code)
        .bind(&record.image_url)
        .bind(record.moq)
        .bind(record.cartons_per_moq)
        .bind(record.pallets_per_moq)
        .bind(record.containers_20ft_per_moq)
        .bind(record.containers_40ft_per_moq)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create product: {:?}", e);
            AppError::Database(e)
        })?;

        for (position, quote) in form.quotes.iter().enumerate() {
            insert_quote(&mut tx, product.id, quote, position as i32).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit product create: {:?}", e);
            AppError::Database(e)
        })?;

        let quotes = self.quotes_for(product.id).await?;
        Ok(ProductResponseDto::from_parts(product, quotes))
    }

    /// Update a product and reconcile its quote rows.
    ///
    /// Ownership is verified inside the transaction, with the row
    /// locked, before any write happens. Removed quote ids are deleted
    /// scoped to this product so a forged tombstone cannot touch
    /// another product's rows.
    pub async fn update(
        &self,
        seller_id: Uuid,
        product_id: Uuid,
        form: &ValidatedProductForm,
    ) -> Result<ProductResponseDto> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        self.assert_owner(&mut tx, product_id, seller_id, "update")
            .await?;

        let record = form.to_record();
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products SET
                name = $1, description = $2, price = $3, currency = $4, status = $5,
                inventory = $6, category_id = $7, subcategory_id = $8, hs_code = $9,
                image_url = $10, moq = $11, cartons_per_moq = $12, pallets_per_moq = $13,
                containers_20ft_per_moq = $14, containers_40ft_per_moq = $15,
                updated_at = now()
            WHERE id = $16
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&record.name)
        .bind(&record.description)
        .bind(record.price)
        .bind(&record.currency)
        .bind(record.status)
        .bind(record.inventory)
        .bind(record.category_id)
        .bind(record.subcategory_id)
        .bind(&record.hs_code)
        .bind(&record.image_url)
        .bind(record.moq)
        .bind(record.cartons_per_moq)
        .bind(record.pallets_per_moq)
        .bind(record.containers_20ft_per_moq)
        .bind(record.containers_40ft_per_moq)
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update product {}: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        if !form.removed_incoterm_ids.is_empty() {
            sqlx::query(
                "DELETE FROM incoterm_quotes WHERE product_id = $1 AND id = ANY($2)",
            )
            .bind(product_id)
            .bind(&form.removed_incoterm_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete removed quotes: {:?}", e);
                AppError::Database(e)
            })?;
        }

        for (position, quote) in form.quotes.iter().enumerate() {
            insert_quote(&mut tx, product_id, quote, position as i32).await?;
        }

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit product update: {:?}", e);
            AppError::Database(e)
        })?;

        let quotes = self.quotes_for(product_id).await?;
        Ok(ProductResponseDto::from_parts(product, quotes))
    }

    /// Delete a product after verifying ownership; quote rows cascade.
    /// Returns the deleted product's name.
    pub async fn delete(&self, seller_id: Uuid, product_id: Uuid) -> Result<String> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        self.assert_owner(&mut tx, product_id, seller_id, "delete")
            .await?;

        let name = sqlx::query_scalar::<_, String>(
            "DELETE FROM products WHERE id = $1 RETURNING name",
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete product {}: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit product delete: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(name)
    }

    /// Lock the product row and verify the caller owns it
    async fn assert_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        seller_id: Uuid,
        action: &str,
    ) -> Result<()> {
        let owner: Option<Uuid> = sqlx::query_scalar(
            "SELECT seller_id FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load product {}: {:?}", product_id, e);
            AppError::Database(e)
        })?;

        if let Err(e) = verify_owner(owner, seller_id, action) {
            if matches!(e, AppError::Forbidden(_)) {
                tracing::warn!(
                    "Seller {} attempted to {} product {} they do not own",
                    seller_id,
                    action,
                    product_id
                );
            }
            return Err(e);
        }

        Ok(())
    }

    async fn quotes_for(&self, product_id: Uuid) -> Result<Vec<IncotermQuote>> {
        sqlx::query_as::<_, IncotermQuote>(&format!(
            "SELECT {} FROM incoterm_quotes WHERE product_id = $1 ORDER BY position",
            QUOTE_COLUMNS
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load quotes for product {}: {:?}", product_id, e);
            AppError::Database(e)
        })
    }
}

/// Decide whether the caller may act on a product.
///
/// A missing row is `NotFound`; a row owned by another seller is
/// `Forbidden` with the action named in the message.
fn verify_owner(owner: Option<Uuid>, seller_id: Uuid, action: &str) -> Result<()> {
    let owner = owner.ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    if owner != seller_id {
        return Err(AppError::Forbidden(format!(
            "You are not allowed to {} this product.",
            action
        )));
    }

    Ok(())
}

/// Upsert one quote row at its list position.
///
/// Rows that came back from the editor with an id keep it; fresh rows
/// get a generated one.
async fn insert_quote(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    quote: &IncotermQuoteInput,
    position: i32,
) -> Result<()> {
    let result = match quote.id {
        Some(id) => {
            sqlx::query(
                r#"
                INSERT INTO incoterm_quotes (id, product_id, term, currency, price, port, position)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (id) DO UPDATE SET
                    term = EXCLUDED.term, currency = EXCLUDED.currency,
                    price = EXCLUDED.price, port = EXCLUDED.port,
                    position = EXCLUDED.position
                WHERE incoterm_quotes.product_id = EXCLUDED.product_id
                "#,
            )
            .bind(id)
            .bind(product_id)
            .bind(quote.term)
            .bind(quote.currency)
            .bind(quote.price)
            .bind(quote.port)
            .bind(position)
            .execute(&mut **tx)
            .await
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO incoterm_quotes (product_id, term, currency, price, port, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(product_id)
            .bind(quote.term)
            .bind(quote.currency)
            .bind(quote.price)
            .bind(quote.port)
            .bind(position)
            .execute(&mut **tx)
            .await
        }
    };

    result.map_err(|e| {
        tracing::error!("Failed to write incoterm quote: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(())
}
