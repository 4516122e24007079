//! Point-of-sale invoice read models.
//!
//! These tables are populated by the POS integration; folio-service only
//! reads them for the detail aggregation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// POS invoice raised against a folio.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub folio_id: Uuid,
    pub posting_date: NaiveDate,
    pub created_utc: DateTime<Utc>,
}

/// Line item on a POS invoice, optionally scoped to a folio window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    pub line_item_id: Uuid,
    pub invoice_id: Uuid,
    pub folio_window_id: Option<Uuid>,
    pub item_code: String,
    pub item_name: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Payment recorded against a POS invoice, optionally scoped to a window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: Uuid,
    pub invoice_id: Uuid,
    pub folio_window_id: Option<Uuid>,
    pub amount: Decimal,
    pub created_utc: DateTime<Utc>,
}
