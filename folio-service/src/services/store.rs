//! Record store capability trait.
//!
//! Handlers and the installer depend on this trait rather than on the
//! concrete PostgreSQL store, so they can be exercised against an in-memory
//! fake in tests.

use crate::models::{CustomFieldDef, FolioSummary, UpsertFolioWindow, WindowUpsert, WorkspaceDef};
use async_trait::async_trait;
use service_core::error::AppError;
use uuid::Uuid;

#[async_trait]
pub trait FolioStore: Send + Sync {
    /// Create or update the window identified by (folio_id, window_code).
    async fn upsert_window(&self, input: &UpsertFolioWindow) -> Result<WindowUpsert, AppError>;

    /// Flat folio projections, optionally filtered by status.
    async fn list_folios(&self, status: Option<&str>) -> Result<Vec<FolioSummary>, AppError>;

    /// Nested detail document for one folio, or None if it does not exist.
    async fn find_folio(&self, folio_id: Uuid) -> Result<Option<serde_json::Value>, AppError>;

    /// Create or replace a desk workspace record by name.
    async fn upsert_workspace(&self, def: &WorkspaceDef) -> Result<(), AppError>;

    /// Create or replace a custom field by (table_name, field_name).
    async fn upsert_custom_field(&self, def: &CustomFieldDef) -> Result<(), AppError>;

    /// Execute a SQL script as a single batch. The script supplies its own
    /// statement boundaries.
    async fn execute_script(&self, sql: &str) -> Result<(), AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}
