//! HTTP handlers for folio-service.

mod folio;
mod health;

pub use folio::{find_folio, list_folios, upsert_folio_window};
pub use health::{health_check, metrics_handler, readiness_check};
