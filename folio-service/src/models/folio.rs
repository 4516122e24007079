//! Folio model for folio-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Folio status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FolioStatus {
    Open,
    Closed,
    Cancelled,
}

impl FolioStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolioStatus::Open => "open",
            FolioStatus::Closed => "closed",
            FolioStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "closed" => FolioStatus::Closed,
            "cancelled" => FolioStatus::Cancelled,
            _ => FolioStatus::Open,
        }
    }
}

/// A guest's running bill for a stay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folio {
    pub folio_id: Uuid,
    pub reservation_id: Uuid,
    pub guest_id: Uuid,
    pub status: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub cashier_id: Option<Uuid>,
    pub total_charges: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Flat projection returned by the folio listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FolioSummary {
    pub folio_id: Uuid,
    pub reservation_id: Uuid,
    pub guest_id: Uuid,
    pub status: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: Option<NaiveDate>,
    pub cashier_id: Option<Uuid>,
    pub total_charges: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}
