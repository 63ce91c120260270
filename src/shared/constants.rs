/// A product always keeps at least one incoterm quote in the editor.
pub const MIN_INCOTERM_QUOTES: usize = 1;

/// Hard cap on incoterm quote rows per product.
pub const MAX_INCOTERM_QUOTES: usize = 5;

/// Currencies offered for the product-level price field.
pub const PRODUCT_CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "CAD", "AUD"];
