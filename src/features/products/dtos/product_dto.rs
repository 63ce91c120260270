use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateUrl;

use crate::core::error::AppError;
use crate::features::products::models::{
    IncotermCurrency, IncotermPort, IncotermQuote, IncotermQuoteInput, IncotermTerm, Product,
    ProductRecordInput, ProductStatus,
};
use crate::shared::validation::HS_CODE_REGEX;

/// A numeric form field as the dashboard sends it: either a JSON number
/// or the raw text still sitting in the input box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FlexibleNumber {
    Number(f64),
    Text(String),
}

impl FlexibleNumber {
    /// Deferred float parse; empty or unparseable text yields None.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexibleNumber::Number(n) => Some(*n).filter(|v| v.is_finite()),
            FlexibleNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        }
    }

    /// Deferred integer parse; fractional numbers are not integers.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            FlexibleNumber::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64
                {
                    Some(*n as i32)
                } else {
                    None
                }
            }
            FlexibleNumber::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<i32>().ok()
            }
        }
    }

    /// True when the field holds only whitespace, i.e. was left blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, FlexibleNumber::Text(s) if s.trim().is_empty())
    }
}

/// Raw form payload for one incoterm quote row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncotermQuoteFormDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub term: IncotermTerm,
    pub currency: IncotermCurrency,
    pub price: FlexibleNumber,
    pub port: IncotermPort,
}

/// Raw form payload for a product, exactly as the dashboard posts it.
///
/// Numeric fields arrive as numbers or numeric strings; everything is
/// normalized in `validate_and_normalize`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductFormDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Explicit product currency; when absent the primary quote's
    /// currency is mirrored onto the record instead.
    #[serde(default)]
    pub currency: Option<String>,
    pub status: ProductStatus,
    #[serde(default)]
    pub inventory: Option<FlexibleNumber>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub subcategory_id: Option<Uuid>,
    #[serde(default)]
    pub hs_code: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub moq: Option<FlexibleNumber>,
    #[serde(default)]
    pub cartons_per_moq: Option<FlexibleNumber>,
    #[serde(default)]
    pub pallets_per_moq: Option<FlexibleNumber>,
    #[serde(default, rename = "containers20ft")]
    pub containers_20ft: Option<FlexibleNumber>,
    #[serde(default, rename = "containers40ft")]
    pub containers_40ft: Option<FlexibleNumber>,
    #[serde(default)]
    pub incoterms: Vec<IncotermQuoteFormDto>,
    #[serde(default)]
    pub removed_incoterm_ids: Vec<Uuid>,
}

/// Normalized, typed form values after schema validation
#[derive(Debug, Clone)]
pub struct ValidatedProductForm {
    pub id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub status: ProductStatus,
    pub inventory: Option<i32>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub hs_code: Option<String>,
    pub image_url: Option<String>,
    pub moq: Option<i32>,
    pub cartons_per_moq: Option<i32>,
    pub pallets_per_moq: Option<i32>,
    pub containers_20ft: Option<i32>,
    pub containers_40ft: Option<i32>,
    pub quotes: Vec<IncotermQuoteInput>,
    pub removed_incoterm_ids: Vec<Uuid>,
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}

fn optional_count(
    field: Option<&FlexibleNumber>,
    label: &str,
    errors: &mut Vec<String>,
) -> Option<i32> {
    let field = field?;
    if field.is_blank() {
        return None;
    }
    match field.as_i32() {
        Some(n) if n < 0 => {
            errors.push(format!("{} cannot be negative", label));
            None
        }
        Some(n) => Some(n),
        None => {
            errors.push(format!("{} must be a whole number", label));
            None
        }
    }
}

impl ProductFormDto {
    /// Run the full schema over the raw payload.
    ///
    /// Produces either a normalized record or a single validation error
    /// whose message joins every field-level message. Pure transform,
    /// no side effects.
    pub fn validate_and_normalize(self) -> Result<ValidatedProductForm, AppError> {
        let mut errors: Vec<String> = Vec::new();

        let name = self.name.trim().to_string();
        if name.chars().count() < 2 {
            errors.push("Product name must be at least 2 characters".to_string());
        } else if name.chars().count() > 120 {
            errors.push("Product name cannot exceed 120 characters".to_string());
        }

        let description = normalize_text(self.description);
        if let Some(d) = &description {
            if d.chars().count() > 500 {
                errors.push("Description cannot exceed 500 characters".to_string());
            }
        }

        let currency = normalize_text(self.currency).map(|c| {
            if c.chars().count() != 3 {
                errors.push("Currency must be a 3-letter code".to_string());
            }
            c.to_uppercase()
        });

        let inventory = match &self.inventory {
            None => None,
            Some(field) if field.is_blank() => None,
            Some(field) => match field.as_i32() {
                Some(n) if n < 0 => {
                    errors.push("Inventory cannot be negative".to_string());
                    None
                }
                Some(n) => Some(n),
                None => {
                    errors.push("Inventory must be a whole number".to_string());
                    None
                }
            },
        };

        let hs_code = normalize_text(self.hs_code);
        if let Some(code) = &hs_code {
            if !HS_CODE_REGEX.is_match(code) {
                errors.push("Enter a valid HS code".to_string());
            }
        }

        let image_url = normalize_text(self.image_url);
        if let Some(url) = &image_url {
            if !url.validate_url() {
                errors.push("Enter a valid image URL".to_string());
            }
        }

        let moq = optional_count(self.moq.as_ref(), "MOQ", &mut errors);
        let cartons_per_moq =
            optional_count(self.cartons_per_moq.as_ref(), "Cartons per MOQ", &mut errors);
        let pallets_per_moq =
            optional_count(self.pallets_per_moq.as_ref(), "Pallets per MOQ", &mut errors);
        let containers_20ft =
            optional_count(self.containers_20ft.as_ref(), "20ft containers", &mut errors);
        let containers_40ft =
            optional_count(self.containers_40ft.as_ref(), "40ft containers", &mut errors);

        let mut quotes = Vec::with_capacity(self.incoterms.len());
        for (idx, quote) in self.incoterms.iter().enumerate() {
            match quote.price.as_f64() {
                Some(price) if price < 0.0 => {
                    errors.push(format!(
                        "Quote {}: price must be greater than or equal to 0",
                        idx + 1
                    ));
                }
                Some(price) => match Decimal::from_f64_retain(price) {
                    Some(price) => quotes.push(IncotermQuoteInput {
                        id: quote.id,
                        term: quote.term,
                        currency: quote.currency,
                        price,
                        port: quote.port,
                    }),
                    None => {
                        errors.push(format!("Quote {}: price must be a number", idx + 1));
                    }
                },
                None => {
                    errors.push(format!("Quote {}: price must be a number", idx + 1));
                }
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join(". ")));
        }

        Ok(ValidatedProductForm {
            id: self.id,
            name,
            description,
            currency,
            status: self.status,
            inventory,
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            hs_code,
            image_url,
            moq,
            cartons_per_moq,
            pallets_per_moq,
            containers_20ft,
            containers_40ft,
            quotes,
            removed_incoterm_ids: self.removed_incoterm_ids,
        })
    }
}

impl ValidatedProductForm {
    /// Flatten into the storage-record shape.
    ///
    /// The first quote is the primary one: its price always mirrors
    /// onto the record, and its currency does too unless an explicit
    /// product currency was supplied.
    pub fn to_record(&self) -> ProductRecordInput {
        let primary = self.quotes.first();
        ProductRecordInput {
            name: self.name.clone(),
            description: self.description.clone(),
            price: primary.map(|q| q.price).unwrap_or_default(),
            currency: self
                .currency
                .clone()
                .or_else(|| primary.map(|q| q.currency.to_string()))
                .unwrap_or_else(|| "USD".to_string()),
            status: self.status,
            inventory: self.inventory,
            category_id: self.category_id,
            subcategory_id: self.subcategory_id,
            hs_code: self.hs_code.clone(),
            image_url: self.image_url.clone(),
            moq: self.moq,
            cartons_per_moq: self.cartons_per_moq,
            pallets_per_moq: self.pallets_per_moq,
            containers_20ft_per_moq: self.containers_20ft,
            containers_40ft_per_moq: self.containers_40ft,
        }
    }
}

/// Response DTO for one incoterm quote
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IncotermQuoteResponseDto {
    pub id: Uuid,
    pub term: IncotermTerm,
    pub currency: IncotermCurrency,
    pub price: f64,
    pub port: IncotermPort,
}

impl From<IncotermQuote> for IncotermQuoteResponseDto {
    fn from(q: IncotermQuote) -> Self {
        Self {
            id: q.id,
            term: q.term,
            currency: q.currency,
            price: q.price.to_f64().unwrap_or(0.0),
            port: q.port,
        }
    }
}

/// Response DTO for product with its quotes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
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
    pub incoterms: Vec<IncotermQuoteResponseDto>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProductResponseDto {
    pub fn from_parts(product: Product, quotes: Vec<IncotermQuote>) -> Self {
        Self {
            id: product.id,
            seller_id: product.seller_id,
            name: product.name,
            description: product.description,
            price: product.price.to_f64().unwrap_or(0.0),
            currency: product.currency,
            status: product.status,
            inventory: product.inventory,
            category_id: product.category_id,
            subcategory_id: product.subcategory_id,
            hs_code: product.hs_code,
            image_url: product.image_url,
            moq: product.moq,
            cartons_per_moq: product.cartons_per_moq,
            pallets_per_moq: product.pallets_per_moq,
            containers_20ft_per_moq: product.containers_20ft_per_moq,
            containers_40ft_per_moq: product.containers_40ft_per_moq,
            incoterms: quotes.into_iter().map(Into::into).collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_dto(price: FlexibleNumber) -> IncotermQuoteFormDto {
        IncotermQuoteFormDto {
            id: None,
            term: IncotermTerm::Fob,
            currency: IncotermCurrency::Usd,
            price,
            port: IncotermPort::Shanghai,
        }
    }

    fn base_form() -> ProductFormDto {
        ProductFormDto {
            id: None,
            name: "Premium cotton t-shirt".to_string(),
            description: Some("  Soft combed cotton.  ".to_string()),
            currency: None,
            status: ProductStatus::Draft,
            inventory: None,
            category_id: None,
            subcategory_id: None,
            hs_code: None,
            image_url: None,
            moq: None,
            cartons_per_moq: None,
            pallets_per_moq: None,
            containers_20ft: None,
            containers_40ft: None,
            incoterms: vec![quote_dto(FlexibleNumber::Text("39.5".to_string()))],
            removed_incoterm_ids: vec![],
        }
    }

    #[test]
    fn test_normalize_trims_and_coerces() {
        let form = ProductFormDto {
            inventory: Some(FlexibleNumber::Text(" 12 ".to_string())),
            currency: Some("usd".to_string()),
            ..base_form()
        };

        let validated = form.validate_and_normalize().unwrap();
        assert_eq!(validated.name, "Premium cotton t-shirt");
        assert_eq!(validated.description.as_deref(), Some("Soft combed cotton."));
        assert_eq!(validated.currency.as_deref(), Some("USD"));
        assert_eq!(validated.inventory, Some(12));
        assert_eq!(
            validated.quotes[0].price,
            Decimal::from_f64_retain(39.5).unwrap()
        );
    }

    #[test]
    fn test_numeric_string_and_number_both_accepted() {
        let from_text = quote_dto(FlexibleNumber::Text("39.5".to_string()));
        let from_number = quote_dto(FlexibleNumber::Number(39.5));
        assert_eq!(from_text.price.as_f64(), from_number.price.as_f64());
    }

    #[test]
    fn test_short_name_rejected() {
        let form = ProductFormDto {
            name: " a ".to_string(),
            ..base_form()
        };
        let err = form.validate_and_normalize().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("at least 2 characters")));
    }

    #[test]
    fn test_empty_description_becomes_null() {
        let form = ProductFormDto {
            description: Some("   ".to_string()),
            ..base_form()
        };
        let validated = form.validate_and_normalize().unwrap();
        assert_eq!(validated.description, None);
    }

    #[test]
    fn test_negative_quote_price_rejected() {
        let form = ProductFormDto {
            incoterms: vec![quote_dto(FlexibleNumber::Number(-1.0))],
            ..base_form()
        };
        let err = form.validate_and_normalize().unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg.contains("greater than or equal to 0"))
        );
    }

    #[test]
    fn test_unparseable_price_rejected() {
        let form = ProductFormDto {
            incoterms: vec![quote_dto(FlexibleNumber::Text("abc".to_string()))],
            ..base_form()
        };
        assert!(form.validate_and_normalize().is_err());
    }

    #[test]
    fn test_blank_inventory_is_unlimited() {
        let form = ProductFormDto {
            inventory: Some(FlexibleNumber::Text("".to_string())),
            ..base_form()
        };
        let validated = form.validate_and_normalize().unwrap();
        assert_eq!(validated.inventory, None);
    }

    #[test]
    fn test_negative_inventory_rejected() {
        let form = ProductFormDto {
            inventory: Some(FlexibleNumber::Text("-3".to_string())),
            ..base_form()
        };
        let err = form.validate_and_normalize().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("Inventory")));
    }

    #[test]
    fn test_errors_joined_across_fields() {
        let form = ProductFormDto {
            name: "x".to_string(),
            inventory: Some(FlexibleNumber::Text("nope".to_string())),
            ..base_form()
        };
        let err = form.validate_and_normalize().unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("Product name"));
                assert!(msg.contains("Inventory"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_mirrors_primary_quote() {
        let mut form = base_form();
        form.incoterms = vec![
            IncotermQuoteFormDto {
                id: None,
                term: IncotermTerm::Exw,
                currency: IncotermCurrency::Rmb,
                price: FlexibleNumber::Number(280.0),
                port: IncotermPort::Ningbo,
            },
            quote_dto(FlexibleNumber::Number(42.0)),
        ];

        let record = form.validate_and_normalize().unwrap().to_record();
        assert_eq!(record.price, Decimal::from_f64_retain(280.0).unwrap());
        assert_eq!(record.currency, "RMB");
    }

    #[test]
    fn test_explicit_currency_wins_over_primary_quote() {
        let form = ProductFormDto {
            currency: Some("eur".to_string()),
            ..base_form()
        };
        let record = form.validate_and_normalize().unwrap().to_record();
        assert_eq!(record.currency, "EUR");
    }

    #[test]
    fn test_invalid_image_url_rejected() {
        let form = ProductFormDto {
            image_url: Some("not a url".to_string()),
            ..base_form()
        };
        let err = form.validate_and_normalize().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("image URL")));
    }
}
