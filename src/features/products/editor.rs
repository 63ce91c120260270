//! In-memory state model for the product editor form.
//!
//! The dashboard drives one `ProductEditor` per open form. All methods
//! are pure state transitions; nothing here touches the database, so
//! the whole edit flow is testable without I/O.

use uuid::Uuid;

use crate::features::categories::dtos::CategoryWithChildrenDto;
use crate::features::products::dtos::{
    FlexibleNumber, IncotermQuoteFormDto, ProductFormDto, ProductResponseDto,
};
use crate::features::products::models::{
    IncotermCurrency, IncotermPort, IncotermTerm, ProductStatus,
};
use crate::shared::constants::{MAX_INCOTERM_QUOTES, MIN_INCOTERM_QUOTES, PRODUCT_CURRENCIES};

/// A numeric field as the user left it: raw text until it parses.
///
/// Keeping the raw text means a half-typed value like `"39."` survives
/// re-renders instead of collapsing to zero, and the parse failure
/// surfaces at submit time with the rest of the validation messages.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericInput {
    Raw(String),
    Parsed(f64),
}

impl NumericInput {
    pub fn blank() -> Self {
        NumericInput::Raw(String::new())
    }

    /// Display text for the input box.
    pub fn text(&self) -> String {
        match self {
            NumericInput::Raw(s) => s.clone(),
            NumericInput::Parsed(n) => n.to_string(),
        }
    }

    pub fn parse_f64(&self) -> Option<f64> {
        match self {
            NumericInput::Raw(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            NumericInput::Parsed(n) => Some(*n).filter(|v| v.is_finite()),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, NumericInput::Raw(s) if s.trim().is_empty())
    }

    fn to_flexible(&self) -> FlexibleNumber {
        match self {
            NumericInput::Raw(s) => FlexibleNumber::Text(s.clone()),
            NumericInput::Parsed(n) => FlexibleNumber::Number(*n),
        }
    }
}

impl From<i32> for NumericInput {
    fn from(n: i32) -> Self {
        NumericInput::Parsed(n as f64)
    }
}

/// One editable incoterm quote row.
///
/// `id` stays `Some` for rows loaded from storage so the update path
/// can match them; rows added in the editor carry `None` until saved.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub id: Option<Uuid>,
    pub term: IncotermTerm,
    pub currency: IncotermCurrency,
    pub price: NumericInput,
    pub port: IncotermPort,
}

impl Default for QuoteRow {
    fn default() -> Self {
        Self {
            id: None,
            term: IncotermTerm::Exw,
            currency: IncotermCurrency::Usd,
            price: NumericInput::blank(),
            port: IncotermPort::Shanghai,
        }
    }
}

/// Every editable field of the form, compared wholesale for dirtiness
#[derive(Debug, Clone, PartialEq)]
pub struct EditorValues {
    pub name: String,
    pub description: String,
    pub status: ProductStatus,
    pub currency: Option<String>,
    pub inventory: NumericInput,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub hs_code: String,
    pub image_url: String,
    pub moq: NumericInput,
    pub cartons_per_moq: NumericInput,
    pub pallets_per_moq: NumericInput,
    pub containers_20ft: NumericInput,
    pub containers_40ft: NumericInput,
    pub quotes: Vec<QuoteRow>,
}

impl Default for EditorValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            status: ProductStatus::Draft,
            currency: None,
            inventory: NumericInput::blank(),
            category_id: None,
            subcategory_id: None,
            hs_code: String::new(),
            image_url: String::new(),
            moq: NumericInput::blank(),
            cartons_per_moq: NumericInput::blank(),
            pallets_per_moq: NumericInput::blank(),
            containers_20ft: NumericInput::blank(),
            containers_40ft: NumericInput::blank(),
            quotes: vec![QuoteRow::default()],
        }
    }
}

/// Derived packaging ratios shown next to the MOQ fields.
///
/// Each ratio is formatted to two decimals and only present when both
/// operands parse and the denominator is positive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackagingRatios {
    pub pieces_per_carton: Option<String>,
    pub cartons_per_pallet: Option<String>,
    pub pallets_per_20ft: Option<String>,
    pub pallets_per_40ft: Option<String>,
}

fn ratio(numerator: &NumericInput, denominator: &NumericInput) -> Option<String> {
    let n = numerator.parse_f64()?;
    let d = denominator.parse_f64()?;
    if d <= 0.0 {
        return None;
    }
    Some(format!("{:.2}", n / d))
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit { product_id: Uuid },
}

/// Form controller for creating or editing one product
#[derive(Debug, Clone)]
pub struct ProductEditor {
    pub mode: EditorMode,
    pub values: EditorValues,
    /// Persisted quote ids the user removed this session; sent as
    /// tombstones so the update can delete exactly those rows.
    pub removed_incoterm_ids: Vec<Uuid>,
    baseline: Option<EditorValues>,
    submitting: bool,
}

impl ProductEditor {
    /// Blank editor with a single default quote row.
    pub fn new_create() -> Self {
        Self {
            mode: EditorMode::Create,
            values: EditorValues::default(),
            removed_incoterm_ids: Vec::new(),
            baseline: None,
            submitting: false,
        }
    }

    /// Editor pre-filled from an existing product; the loaded values
    /// become the dirtiness baseline.
    pub fn edit(product: &ProductResponseDto) -> Self {
        let quotes = if product.incoterms.is_empty() {
            vec![QuoteRow::default()]
        } else {
            product
                .incoterms
                .iter()
                .map(|q| QuoteRow {
                    id: Some(q.id),
                    term: q.term,
                    currency: q.currency,
                    price: NumericInput::Parsed(q.price),
                    port: q.port,
                })
                .collect()
        };

        let values = EditorValues {
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            status: product.status,
            currency: Some(product.currency.clone()),
            inventory: product
                .inventory
                .map(NumericInput::from)
                .unwrap_or_else(NumericInput::blank),
            category_id: product.category_id,
            subcategory_id: product.subcategory_id,
            hs_code: product.hs_code.clone().unwrap_or_default(),
            image_url: product.image_url.clone().unwrap_or_default(),
            moq: product
                .moq
                .map(NumericInput::from)
                .unwrap_or_else(NumericInput::blank),
            cartons_per_moq: product
                .cartons_per_moq
                .map(NumericInput::from)
                .unwrap_or_else(NumericInput::blank),
            pallets_per_moq: product
                .pallets_per_moq
                .map(NumericInput::from)
                .unwrap_or_else(NumericInput::blank),
            containers_20ft: product
                .containers_20ft_per_moq
                .map(NumericInput::from)
                .unwrap_or_else(NumericInput::blank),
            containers_40ft: product
                .containers_40ft_per_moq
                .map(NumericInput::from)
                .unwrap_or_else(NumericInput::blank),
            quotes,
        };

        Self {
            mode: EditorMode::Edit {
                product_id: product.id,
            },
            baseline: Some(values.clone()),
            values,
            removed_incoterm_ids: Vec::new(),
            submitting: false,
        }
    }

    /// Options for the product-level currency select.
    pub fn currency_options() -> &'static [&'static str] {
        &PRODUCT_CURRENCIES
    }

    /// Append a fresh quote row; silently caps at the maximum.
    pub fn add_quote(&mut self) {
        if self.values.quotes.len() >= MAX_INCOTERM_QUOTES {
            return;
        }
        self.values.quotes.push(QuoteRow::default());
    }

    /// Remove the row at `index`. The last remaining row cannot be
    /// removed; persisted rows leave a tombstone behind.
    pub fn remove_quote(&mut self, index: usize) {
        if self.values.quotes.len() <= MIN_INCOTERM_QUOTES || index >= self.values.quotes.len() {
            return;
        }
        let removed = self.values.quotes.remove(index);
        if let Some(id) = removed.id {
            self.removed_incoterm_ids.push(id);
        }
    }

    /// Change the selected category and cascade the subcategory: keep
    /// it if it still belongs to the new category, otherwise fall to
    /// the new category's first child, or clear it entirely.
    pub fn select_category(
        &mut self,
        category_id: Option<Uuid>,
        catalog: &[CategoryWithChildrenDto],
    ) {
        self.values.category_id = category_id;

        let children = category_id
            .and_then(|id| catalog.iter().find(|c| c.id == id))
            .map(|c| c.subcategories.as_slice())
            .unwrap_or(&[]);

        let current_still_valid = self
            .values
            .subcategory_id
            .map(|sub| children.iter().any(|s| s.id == sub))
            .unwrap_or(false);

        if !current_still_valid {
            self.values.subcategory_id = children.first().map(|s| s.id);
        }
    }

    pub fn select_subcategory(&mut self, subcategory_id: Option<Uuid>) {
        self.values.subcategory_id = subcategory_id;
    }

    pub fn packaging_ratios(&self) -> PackagingRatios {
        let v = &self.values;
        PackagingRatios {
            pieces_per_carton: ratio(&v.moq, &v.cartons_per_moq),
            cartons_per_pallet: ratio(&v.cartons_per_moq, &v.pallets_per_moq),
            pallets_per_20ft: ratio(&v.pallets_per_moq, &v.containers_20ft),
            pallets_per_40ft: ratio(&v.pallets_per_moq, &v.containers_40ft),
        }
    }

    /// A freshly opened create form is always submittable; an edit form
    /// is dirty once any value changed or a persisted quote was removed.
    pub fn is_dirty(&self) -> bool {
        match &self.baseline {
            None => true,
            Some(baseline) => {
                *baseline != self.values || !self.removed_incoterm_ids.is_empty()
            }
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && self.is_dirty()
    }

    /// Validate the current values and hand back the wire payload.
    ///
    /// On failure the joined field messages come back for the form
    /// banner and the editor stays editable. On success the editor is
    /// marked submitting until `settle` is called.
    pub fn submit(&mut self) -> Result<ProductFormDto, String> {
        if !self.can_submit() {
            return Err("Nothing to save.".to_string());
        }
        if self.values.quotes.is_empty() {
            return Err("Add at least one incoterm quote.".to_string());
        }

        let form = self.to_form();
        match form.clone().validate_and_normalize() {
            Ok(_) => {
                self.submitting = true;
                Ok(form)
            }
            Err(crate::core::error::AppError::Validation(message)) => Err(message),
            Err(other) => Err(other.to_string()),
        }
    }

    /// Clear the submitting flag after the request settles, whether it
    /// succeeded or failed.
    pub fn settle(&mut self) {
        self.submitting = false;
    }

    fn to_form(&self) -> ProductFormDto {
        let v = &self.values;
        let optional = |field: &NumericInput| -> Option<FlexibleNumber> {
            if field.is_blank() {
                None
            } else {
                Some(field.to_flexible())
            }
        };

        ProductFormDto {
            id: match &self.mode {
                EditorMode::Create => None,
                EditorMode::Edit { product_id } => Some(*product_id),
            },
            name: v.name.clone(),
            description: Some(v.description.clone()),
            currency: v.currency.clone(),
            status: v.status,
            inventory: optional(&v.inventory),
            category_id: v.category_id,
            subcategory_id: v.subcategory_id,
            hs_code: Some(v.hs_code.clone()),
            image_url: Some(v.image_url.clone()),
            moq: optional(&v.moq),
            cartons_per_moq: optional(&v.cartons_per_moq),
            pallets_per_moq: optional(&v.pallets_per_moq),
            containers_20ft: optional(&v.containers_20ft),
            containers_40ft: optional(&v.containers_40ft),
            incoterms: v
                .quotes
                .iter()
                .map(|q| IncotermQuoteFormDto {
                    id: q.id,
                    term: q.term,
                    currency: q.currency,
                    price: q.price.to_flexible(),
                    port: q.port,
                })
                .collect(),
            removed_incoterm_ids: self.removed_incoterm_ids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::dtos::SubcategoryResponseDto;
    use crate::features::products::dtos::IncotermQuoteResponseDto;
    use chrono::Utc;

    fn catalog() -> Vec<CategoryWithChildrenDto> {
        let apparel = Uuid::new_v4();
        let machinery = Uuid::new_v4();
        vec![
            CategoryWithChildrenDto {
                id: apparel,
                name: "Apparel".to_string(),
                slug: "apparel".to_string(),
                subcategories: vec![
                    SubcategoryResponseDto {
                        id: Uuid::new_v4(),
                        category_id: apparel,
                        name: "Shirts".to_string(),
                        slug: "shirts".to_string(),
                    },
                    SubcategoryResponseDto {
                        id: Uuid::new_v4(),
                        category_id: apparel,
                        name: "Trousers".to_string(),
                        slug: "trousers".to_string(),
                    },
                ],
            },
            CategoryWithChildrenDto {
                id: machinery,
                name: "Machinery".to_string(),
                slug: "machinery".to_string(),
                subcategories: vec![],
            },
        ]
    }

    fn saved_product() -> ProductResponseDto {
        let product_id = Uuid::new_v4();
        ProductResponseDto {
            id: product_id,
            seller_id: Uuid::new_v4(),
            name: "Steel bracket".to_string(),
            description: Some("Cold-rolled.".to_string()),
            price: 12.5,
            currency: "USD".to_string(),
            status: ProductStatus::Published,
            inventory: Some(400),
            category_id: None,
            subcategory_id: None,
            hs_code: None,
            image_url: None,
            moq: Some(1000),
            cartons_per_moq: Some(100),
            pallets_per_moq: None,
            containers_20ft_per_moq: None,
            containers_40ft_per_moq: None,
            incoterms: vec![IncotermQuoteResponseDto {
                id: Uuid::new_v4(),
                term: IncotermTerm::Fob,
                currency: IncotermCurrency::Usd,
                price: 12.5,
                port: IncotermPort::Shanghai,
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_starts_with_one_quote_row() {
        let editor = ProductEditor::new_create();
        assert_eq!(editor.values.quotes.len(), 1);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_currency_options_cover_usd() {
        assert!(ProductEditor::currency_options().contains(&"USD"));
    }

    #[test]
    fn test_add_quote_caps_at_maximum() {
        let mut editor = ProductEditor::new_create();
        for _ in 0..10 {
            editor.add_quote();
        }
        assert_eq!(editor.values.quotes.len(), MAX_INCOTERM_QUOTES);
    }

    #[test]
    fn test_last_quote_row_cannot_be_removed() {
        let mut editor = ProductEditor::new_create();
        editor.remove_quote(0);
        assert_eq!(editor.values.quotes.len(), 1);
    }

    #[test]
    fn test_removing_persisted_quote_leaves_tombstone() {
        let mut editor = ProductEditor::edit(&saved_product());
        editor.add_quote();
        let persisted_id = editor.values.quotes[0].id.unwrap();

        editor.remove_quote(0);

        assert_eq!(editor.removed_incoterm_ids, vec![persisted_id]);
        assert_eq!(editor.values.quotes.len(), 1);
        assert!(editor.values.quotes[0].id.is_none());
    }

    #[test]
    fn test_removing_unsaved_quote_leaves_no_tombstone() {
        let mut editor = ProductEditor::new_create();
        editor.add_quote();
        editor.remove_quote(1);
        assert!(editor.removed_incoterm_ids.is_empty());
    }

    #[test]
    fn test_category_change_resets_subcategory_to_first_child() {
        let catalog = catalog();
        let mut editor = ProductEditor::new_create();

        editor.select_category(Some(catalog[0].id), &catalog);
        assert_eq!(
            editor.values.subcategory_id,
            Some(catalog[0].subcategories[0].id)
        );
    }

    #[test]
    fn test_category_change_keeps_subcategory_still_in_family() {
        let catalog = catalog();
        let mut editor = ProductEditor::new_create();
        editor.select_category(Some(catalog[0].id), &catalog);
        editor.select_subcategory(Some(catalog[0].subcategories[1].id));

        // re-selecting the same category keeps the manual choice
        editor.select_category(Some(catalog[0].id), &catalog);
        assert_eq!(
            editor.values.subcategory_id,
            Some(catalog[0].subcategories[1].id)
        );
    }

    #[test]
    fn test_category_without_children_clears_subcategory() {
        let catalog = catalog();
        let mut editor = ProductEditor::new_create();
        editor.select_category(Some(catalog[0].id), &catalog);
        editor.select_category(Some(catalog[1].id), &catalog);
        assert_eq!(editor.values.subcategory_id, None);
    }

    #[test]
    fn test_packaging_ratios_skip_zero_and_blank_denominators() {
        let mut editor = ProductEditor::new_create();
        editor.values.moq = NumericInput::Raw("500".to_string());
        editor.values.cartons_per_moq = NumericInput::Raw("50".to_string());
        editor.values.pallets_per_moq = NumericInput::Raw("0".to_string());
        editor.values.containers_20ft = NumericInput::Raw("".to_string());

        let ratios = editor.packaging_ratios();
        assert_eq!(ratios.pieces_per_carton.as_deref(), Some("10.00"));
        assert_eq!(ratios.cartons_per_pallet, None);
        assert_eq!(ratios.pallets_per_20ft, None);
        assert_eq!(ratios.pallets_per_40ft, None);
    }

    #[test]
    fn test_clean_edit_form_cannot_submit() {
        let mut editor = ProductEditor::edit(&saved_product());
        assert!(!editor.is_dirty());
        assert!(editor.submit().is_err());
    }

    #[test]
    fn test_edit_becomes_dirty_on_change_and_submits() {
        let mut editor = ProductEditor::edit(&saved_product());
        editor.values.name = "Steel bracket, galvanized".to_string();
        assert!(editor.is_dirty());

        let form = editor.submit().expect("dirty valid form should submit");
        assert_eq!(form.name, "Steel bracket, galvanized");
        assert!(editor.is_submitting());
        assert!(!editor.can_submit());

        editor.settle();
        assert!(editor.can_submit());
    }

    #[test]
    fn test_tombstone_alone_makes_edit_dirty() {
        let mut editor = ProductEditor::edit(&saved_product());
        editor.add_quote();
        editor.values.quotes[1].price = NumericInput::Parsed(9.0);
        editor.remove_quote(0);
        // row list is back to one entry but a persisted row is gone
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_submit_surfaces_validation_messages() {
        let mut editor = ProductEditor::new_create();
        editor.values.name = "x".to_string();
        editor.values.quotes[0].price = NumericInput::Parsed(10.0);

        let err = editor.submit().unwrap_err();
        assert!(err.contains("Product name must be at least 2 characters"));
        assert!(!editor.is_submitting());
    }

    #[test]
    fn test_edit_submit_carries_product_id_and_tombstones() {
        let product = saved_product();
        let mut editor = ProductEditor::edit(&product);
        editor.add_quote();
        editor.values.quotes[1].price = NumericInput::Raw("15.75".to_string());
        let persisted_id = editor.values.quotes[0].id.unwrap();
        editor.remove_quote(0);

        let form = editor.submit().unwrap();
        assert_eq!(form.id, Some(product.id));
        assert_eq!(form.removed_incoterm_ids, vec![persisted_id]);
    }
}
