//! Services module for folio-service.

pub mod database;
pub mod installer;
pub mod metrics;
pub mod store;

pub use database::Database;
pub use installer::Installer;
pub use metrics::{get_metrics, init_metrics};
pub use store::FolioStore;
