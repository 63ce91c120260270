use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Trade term codes offered to sellers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incoterm_term", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum IncotermTerm {
    Exw,
    Fob,
    Cfr,
}

impl std::fmt::Display for IncotermTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncotermTerm::Exw => write!(f, "EXW"),
            IncotermTerm::Fob => write!(f, "FOB"),
            IncotermTerm::Cfr => write!(f, "CFR"),
        }
    }
}

/// Currencies accepted on incoterm quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incoterm_currency", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum IncotermCurrency {
    Usd,
    Rmb,
}

impl std::fmt::Display for IncotermCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncotermCurrency::Usd => write!(f, "USD"),
            IncotermCurrency::Rmb => write!(f, "RMB"),
        }
    }
}

/// Ports a quote can be priced against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "incoterm_port")]
pub enum IncotermPort {
    #[sqlx(rename = "Shanghai Port")]
    #[serde(rename = "Shanghai Port")]
    Shanghai,
    #[sqlx(rename = "Ningbo Port")]
    #[serde(rename = "Ningbo Port")]
    Ningbo,
    #[sqlx(rename = "Guangzhou Port")]
    #[serde(rename = "Guangzhou Port")]
    Guangzhou,
    #[sqlx(rename = "Bandar Abbas")]
    #[serde(rename = "Bandar Abbas")]
    BandarAbbas,
}

impl std::fmt::Display for IncotermPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncotermPort::Shanghai => write!(f, "Shanghai Port"),
            IncotermPort::Ningbo => write!(f, "Ningbo Port"),
            IncotermPort::Guangzhou => write!(f, "Guangzhou Port"),
            IncotermPort::BandarAbbas => write!(f, "Bandar Abbas"),
        }
    }
}

/// Database model for incoterm quote
#[derive(Debug, Clone, FromRow)]
pub struct IncotermQuote {
    pub id: Uuid,
    pub product_id: Uuid,
    pub term: IncotermTerm,
    pub currency: IncotermCurrency,
    pub price: Decimal,
    pub port: IncotermPort,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Write shape for one quote row.
///
/// `id` is `None` for rows added client-side; the update path upserts
/// by id so untouched persisted rows keep theirs.
#[derive(Debug, Clone)]
pub struct IncotermQuoteInput {
    pub id: Option<Uuid>,
    pub term: IncotermTerm,
    pub currency: IncotermCurrency,
    pub price: Decimal,
    pub port: IncotermPort,
}
