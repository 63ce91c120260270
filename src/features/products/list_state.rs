//! Dashboard product-list reconciliation.
//!
//! Mutations come back from the server as full product payloads; this
//! keeps the visible list in sync without a refetch and produces the
//! toast for each settled action.

use uuid::Uuid;

use crate::features::products::dtos::ProductResponseDto;

/// Outcome banner for a settled mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Toast {
    Success(String),
    Error(String),
}

/// Client-side view of the seller's product list
#[derive(Debug, Clone, Default)]
pub struct ProductListState {
    pub products: Vec<ProductResponseDto>,
    /// Product awaiting delete confirmation, if any.
    pub pending_delete: Option<Uuid>,
}

impl ProductListState {
    /// Replace the list wholesale, e.g. after the initial fetch.
    pub fn sync(&mut self, products: Vec<ProductResponseDto>) {
        self.products = products;
    }

    /// Newest products sort first, so a created one goes on top.
    pub fn apply_create(&mut self, product: ProductResponseDto) -> Toast {
        let toast = Toast::Success(format!("{} created.", product.name));
        self.products.insert(0, product);
        toast
    }

    /// Swap the updated product into place, keeping list order.
    pub fn apply_update(&mut self, product: ProductResponseDto) -> Toast {
        let toast = Toast::Success(format!("{} updated.", product.name));
        if let Some(slot) = self.products.iter_mut().find(|p| p.id == product.id) {
            *slot = product;
        }
        toast
    }

    /// A failed create or update leaves the list untouched; the toast
    /// echoes the error string the action reported.
    pub fn apply_failure(&mut self, error: String) -> Toast {
        Toast::Error(error)
    }

    pub fn begin_delete(&mut self, product_id: Uuid) {
        self.pending_delete = Some(product_id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Settle a delete with the action's result. On success the product
    /// is dropped from the list; on failure the list is untouched and
    /// the toast echoes the reported error string. The confirmation
    /// state clears either way.
    pub fn apply_delete(&mut self, product_id: Uuid, result: Result<(), String>) -> Toast {
        self.pending_delete = None;

        match result {
            Ok(()) => {
                let name = self
                    .products
                    .iter()
                    .find(|p| p.id == product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Product".to_string());
                self.products.retain(|p| p.id != product_id);
                Toast::Success(format!("{} deleted.", name))
            }
            Err(error) => Toast::Error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::products::models::ProductStatus;
    use chrono::Utc;

    fn product(name: &str) -> ProductResponseDto {
        ProductResponseDto {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: 10.0,
            currency: "USD".to_string(),
            status: ProductStatus::Draft,
            inventory: None,
            category_id: None,
            subcategory_id: None,
            hs_code: None,
            image_url: None,
            moq: None,
            cartons_per_moq: None,
            pallets_per_moq: None,
            containers_20ft_per_moq: None,
            containers_40ft_per_moq: None,
            incoterms: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_prepends_and_toasts() {
        let mut state = ProductListState::default();
        state.sync(vec![product("Older")]);

        let toast = state.apply_create(product("Newer"));

        assert_eq!(state.products.len(), 2);
        assert_eq!(state.products[0].name, "Newer");
        assert_eq!(toast, Toast::Success("Newer created.".to_string()));
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut state = ProductListState::default();
        let first = product("First");
        let second = product("Second");
        state.sync(vec![first.clone(), second.clone()]);

        let mut renamed = second.clone();
        renamed.name = "Second, revised".to_string();
        let toast = state.apply_update(renamed);

        assert_eq!(state.products[0].id, first.id);
        assert_eq!(state.products[1].name, "Second, revised");
        assert_eq!(toast, Toast::Success("Second, revised updated.".to_string()));
    }

    #[test]
    fn test_delete_removes_and_clears_confirmation() {
        let mut state = ProductListState::default();
        let doomed = product("Doomed");
        state.sync(vec![doomed.clone(), product("Kept")]);

        state.begin_delete(doomed.id);
        assert_eq!(state.pending_delete, Some(doomed.id));

        let toast = state.apply_delete(doomed.id, Ok(()));

        assert_eq!(state.products.len(), 1);
        assert_eq!(state.pending_delete, None);
        assert_eq!(toast, Toast::Success("Doomed deleted.".to_string()));
    }

    #[test]
    fn test_failed_delete_keeps_product_but_clears_confirmation() {
        let mut state = ProductListState::default();
        let survivor = product("Survivor");
        state.sync(vec![survivor.clone()]);
        state.begin_delete(survivor.id);

        let toast = state.apply_delete(
            survivor.id,
            Err("Database error occurred".to_string()),
        );

        assert_eq!(state.products.len(), 1);
        assert_eq!(state.pending_delete, None);
        assert_eq!(toast, Toast::Error("Database error occurred".to_string()));
    }

    #[test]
    fn test_failed_save_toast_echoes_reported_error() {
        let mut state = ProductListState::default();
        state.sync(vec![product("Kept")]);

        let toast =
            state.apply_failure("You are not allowed to update this product.".to_string());

        assert_eq!(state.products.len(), 1);
        assert_eq!(
            toast,
            Toast::Error("You are not allowed to update this product.".to_string())
        );
    }
}
