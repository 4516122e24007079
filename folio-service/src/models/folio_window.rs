//! Folio window model for folio-service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named bucket within a folio used to group charges and payments.
///
/// At most one window exists per (folio_id, window_code); the store enforces
/// this with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FolioWindow {
    pub folio_window_id: Uuid,
    pub folio_id: Uuid,
    pub window_code: String,
    pub window_label: String,
    pub remarks: String,
    pub total_charges: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
    pub created_utc: DateTime<Utc>,
}

/// Input for the window upsert.
#[derive(Debug, Clone)]
pub struct UpsertFolioWindow {
    pub folio_id: Uuid,
    pub window_code: String,
    pub window_label: Option<String>,
    pub remarks: Option<String>,
}

/// Which side of the upsert was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertAction {
    Created,
    Updated,
}

impl UpsertAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpsertAction::Created => "created",
            UpsertAction::Updated => "updated",
        }
    }
}

/// Result of the window upsert.
#[derive(Debug, Clone)]
pub struct WindowUpsert {
    pub window: FolioWindow,
    pub action: UpsertAction,
}
