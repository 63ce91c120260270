mod incoterm;
mod product;

pub use incoterm::{IncotermCurrency, IncotermPort, IncotermQuote, IncotermQuoteInput, IncotermTerm};
pub use product::{Product, ProductRecordInput, ProductStatus};
