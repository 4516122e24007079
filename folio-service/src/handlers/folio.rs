//! Folio endpoints: window upsert, listing, detail aggregation.

use crate::models::{FolioSummary, UpsertAction, UpsertFolioWindow};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UpsertWindowRequest {
    pub folio_id: Uuid,
    pub window_code: String,
    #[serde(default)]
    pub window_label: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpsertWindowResponse {
    pub ok: bool,
    pub folio_window_id: Uuid,
    pub action: UpsertAction,
}

/// POST /api/folio-windows
pub async fn upsert_folio_window(
    State(state): State<AppState>,
    Json(req): Json<UpsertWindowRequest>,
) -> Result<Json<UpsertWindowResponse>, AppError> {
    if req.window_code.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "window_code is required"
        )));
    }

    let input = UpsertFolioWindow {
        folio_id: req.folio_id,
        window_code: req.window_code,
        window_label: req.window_label,
        remarks: req.remarks,
    };
    let upsert = state.store.upsert_window(&input).await?;

    Ok(Json(UpsertWindowResponse {
        ok: true,
        folio_window_id: upsert.window.folio_window_id,
        action: upsert.action,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFoliosParams {
    /// Status filter; an unknown value simply matches nothing.
    pub status: Option<String>,
}

/// GET /api/folios
pub async fn list_folios(
    State(state): State<AppState>,
    Query(params): Query<ListFoliosParams>,
) -> Result<Json<Vec<FolioSummary>>, AppError> {
    let status = params.status.as_deref().filter(|s| !s.is_empty());
    let folios = state.store.list_folios(status).await?;
    Ok(Json(folios))
}

/// GET /api/folios/:folio_id
///
/// Returns the nested detail document, or `null` when the folio does not
/// exist.
pub async fn find_folio(
    State(state): State<AppState>,
    Path(folio_id): Path<Uuid>,
) -> Result<Json<Option<serde_json::Value>>, AppError> {
    let detail = state.store.find_folio(folio_id).await?;
    Ok(Json(detail))
}
