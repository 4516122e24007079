//! Test helper module for folio-service integration tests.
//!
//! Provides an in-memory `FolioStore` fake and a `TestApp` wrapper that
//! drives the real router through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, Utc};
use folio_service::config::{DatabaseConfig, FolioConfig, InstallerConfig};
use folio_service::models::{
    CustomFieldDef, Folio, FolioStatus, FolioSummary, FolioWindow, Invoice, LineItem, Payment,
    UpsertAction, UpsertFolioWindow, WindowUpsert, WorkspaceDef,
};
use folio_service::services::{init_metrics, FolioStore};
use folio_service::startup::{build_router, AppState};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Default)]
struct FakeData {
    folios: Vec<Folio>,
    windows: Vec<FolioWindow>,
    invoices: Vec<Invoice>,
    line_items: Vec<LineItem>,
    payments: Vec<Payment>,
    workspaces: HashMap<String, WorkspaceDef>,
    custom_fields: HashMap<(String, String), CustomFieldDef>,
    executed_scripts: Vec<String>,
}

/// In-memory record store with the same observable behavior as the
/// PostgreSQL implementation.
#[derive(Default)]
pub struct FakeFolioStore {
    inner: Mutex<FakeData>,
}

impl FakeFolioStore {
    pub fn seed_folio(&self, status: FolioStatus) -> Uuid {
        let folio_id = Uuid::new_v4();
        self.inner.lock().unwrap().folios.push(Folio {
            folio_id,
            reservation_id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            status: status.as_str().to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            check_out_date: Some(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()),
            cashier_id: None,
            total_charges: Decimal::ZERO,
            total_payments: Decimal::ZERO,
            balance: Decimal::ZERO,
            created_utc: Utc::now(),
        });
        folio_id
    }

    pub fn seed_invoice(&self, folio_id: Uuid, posting_date: NaiveDate) -> Uuid {
        let invoice_id = Uuid::new_v4();
        self.inner.lock().unwrap().invoices.push(Invoice {
            invoice_id,
            folio_id,
            posting_date,
            created_utc: Utc::now(),
        });
        invoice_id
    }

    pub fn seed_line_item(
        &self,
        invoice_id: Uuid,
        folio_window_id: Option<Uuid>,
        item_code: &str,
        item_name: &str,
        quantity: Decimal,
        rate: Decimal,
    ) -> Uuid {
        let line_item_id = Uuid::new_v4();
        self.inner.lock().unwrap().line_items.push(LineItem {
            line_item_id,
            invoice_id,
            folio_window_id,
            item_code: item_code.to_string(),
            item_name: item_name.to_string(),
            quantity,
            rate,
            amount: quantity * rate,
            created_utc: Utc::now(),
        });
        line_item_id
    }

    pub fn seed_payment(&self, invoice_id: Uuid, folio_window_id: Option<Uuid>, amount: Decimal) {
        self.inner.lock().unwrap().payments.push(Payment {
            payment_id: Uuid::new_v4(),
            invoice_id,
            folio_window_id,
            amount,
            created_utc: Utc::now(),
        });
    }

    pub fn window(&self, folio_id: Uuid, window_code: &str) -> Option<FolioWindow> {
        self.inner
            .lock()
            .unwrap()
            .windows
            .iter()
            .find(|w| w.folio_id == folio_id && w.window_code == window_code)
            .cloned()
    }

    pub fn window_count(&self, folio_id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .windows
            .iter()
            .filter(|w| w.folio_id == folio_id)
            .count()
    }

    /// Simulate the external totals recompute job.
    pub fn set_window_totals(
        &self,
        folio_window_id: Uuid,
        charges: Decimal,
        payments: Decimal,
    ) {
        let mut data = self.inner.lock().unwrap();
        if let Some(window) = data
            .windows
            .iter_mut()
            .find(|w| w.folio_window_id == folio_window_id)
        {
            window.total_charges = charges;
            window.total_payments = payments;
            window.balance = charges - payments;
        }
    }

    pub fn workspaces(&self) -> Vec<WorkspaceDef> {
        self.inner.lock().unwrap().workspaces.values().cloned().collect()
    }

    pub fn custom_fields(&self) -> Vec<CustomFieldDef> {
        self.inner
            .lock()
            .unwrap()
            .custom_fields
            .values()
            .cloned()
            .collect()
    }

    pub fn executed_scripts(&self) -> Vec<String> {
        self.inner.lock().unwrap().executed_scripts.clone()
    }
}

/// Decimal as a JSON number, matching json_build_object output.
fn num(d: Decimal) -> Value {
    Value::from(d.to_f64().unwrap_or_default())
}

#[async_trait]
impl FolioStore for FakeFolioStore {
    async fn upsert_window(&self, input: &UpsertFolioWindow) -> Result<WindowUpsert, AppError> {
        let mut data = self.inner.lock().unwrap();

        if !data.folios.iter().any(|f| f.folio_id == input.folio_id) {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Folio {} not found",
                input.folio_id
            )));
        }

        let label = input.window_label.as_deref().filter(|s| !s.is_empty());
        let remarks = input.remarks.as_deref().filter(|s| !s.is_empty());

        if let Some(window) = data
            .windows
            .iter_mut()
            .find(|w| w.folio_id == input.folio_id && w.window_code == input.window_code)
        {
            if let Some(label) = label {
                window.window_label = label.to_string();
            }
            if let Some(remarks) = remarks {
                window.remarks = remarks.to_string();
            }
            return Ok(WindowUpsert {
                window: window.clone(),
                action: UpsertAction::Updated,
            });
        }

        let window = FolioWindow {
            folio_window_id: Uuid::new_v4(),
            folio_id: input.folio_id,
            window_code: input.window_code.clone(),
            window_label: label.unwrap_or("").to_string(),
            remarks: remarks.unwrap_or("").to_string(),
            total_charges: Decimal::ZERO,
            total_payments: Decimal::ZERO,
            balance: Decimal::ZERO,
            created_utc: Utc::now(),
        };
        data.windows.push(window.clone());
        Ok(WindowUpsert {
            window,
            action: UpsertAction::Created,
        })
    }

    async fn list_folios(&self, status: Option<&str>) -> Result<Vec<FolioSummary>, AppError> {
        let data = self.inner.lock().unwrap();
        Ok(data
            .folios
            .iter()
            .filter(|f| status.is_none() || status == Some(f.status.as_str()))
            .map(|f| FolioSummary {
                folio_id: f.folio_id,
                reservation_id: f.reservation_id,
                guest_id: f.guest_id,
                status: f.status.clone(),
                check_in_date: f.check_in_date,
                check_out_date: f.check_out_date,
                cashier_id: f.cashier_id,
                total_charges: f.total_charges,
                total_payments: f.total_payments,
                balance: f.balance,
            })
            .collect())
    }

    async fn find_folio(&self, folio_id: Uuid) -> Result<Option<Value>, AppError> {
        let data = self.inner.lock().unwrap();

        let Some(folio) = data.folios.iter().find(|f| f.folio_id == folio_id) else {
            return Ok(None);
        };

        // Arbitrary tie-break, like the store's LIMIT 1.
        let invoice = data.invoices.iter().find(|i| i.folio_id == folio_id);

        let invoice_json = invoice.map(|invoice| {
            let windows: Vec<Value> = data
                .windows
                .iter()
                .filter(|w| w.folio_id == folio_id)
                .filter(|w| {
                    data.line_items.iter().any(|li| {
                        li.invoice_id == invoice.invoice_id
                            && li.folio_window_id == Some(w.folio_window_id)
                    })
                })
                .map(|w| {
                    let items: Vec<Value> = data
                        .line_items
                        .iter()
                        .filter(|li| {
                            li.invoice_id == invoice.invoice_id
                                && li.folio_window_id == Some(w.folio_window_id)
                        })
                        .map(|li| {
                            json!({
                                "line_item_id": li.line_item_id,
                                "item_code": li.item_code,
                                "item_name": li.item_name,
                                "quantity": num(li.quantity),
                                "rate": num(li.rate),
                                "amount": num(li.amount),
                            })
                        })
                        .collect();

                    let total_amount: Decimal = data
                        .line_items
                        .iter()
                        .filter(|li| {
                            li.invoice_id == invoice.invoice_id
                                && li.folio_window_id == Some(w.folio_window_id)
                        })
                        .map(|li| li.amount)
                        .sum();
                    let total_paid: Decimal = data
                        .payments
                        .iter()
                        .filter(|p| {
                            p.invoice_id == invoice.invoice_id
                                && p.folio_window_id == Some(w.folio_window_id)
                        })
                        .map(|p| p.amount)
                        .sum();

                    json!({
                        "window_id": w.folio_window_id,
                        "window_code": w.window_code,
                        "items": items,
                        "total_amount": num(total_amount),
                        "total_paid": num(total_paid),
                    })
                })
                .collect();

            json!({
                "invoice_id": invoice.invoice_id,
                "invoice_date": invoice.posting_date,
                "windows": windows,
            })
        });

        Ok(Some(json!({
            "folio_id": folio.folio_id,
            "reservation_id": folio.reservation_id,
            "guest_id": folio.guest_id,
            "status": folio.status,
            "check_in_date": folio.check_in_date,
            "check_out_date": folio.check_out_date,
            "invoice": invoice_json,
        })))
    }

    async fn upsert_workspace(&self, def: &WorkspaceDef) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .workspaces
            .insert(def.name.clone(), def.clone());
        Ok(())
    }

    async fn upsert_custom_field(&self, def: &CustomFieldDef) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .custom_fields
            .insert((def.table_name.clone(), def.field_name.clone()), def.clone());
        Ok(())
    }

    async fn execute_script(&self, sql: &str) -> Result<(), AppError> {
        self.inner
            .lock()
            .unwrap()
            .executed_scripts
            .push(sql.to_string());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn test_config() -> FolioConfig {
    FolioConfig {
        common: CoreConfig {
            port: 0,
            log_level: "warn".to_string(),
        },
        service_name: "folio-service-test".to_string(),
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 2,
            min_connections: 1,
        },
        installer: InstallerConfig {
            customfields_dir: "setup/customfields".into(),
            sql_dir: "sql".into(),
        },
    }
}

/// Test application wrapper driving the router in-process.
pub struct TestApp {
    router: Router,
    pub store: Arc<FakeFolioStore>,
}

impl TestApp {
    pub fn spawn() -> Self {
        init_metrics();

        let store = Arc::new(FakeFolioStore::default());
        let state = AppState {
            config: test_config(),
            store: store.clone() as Arc<dyn FolioStore>,
        };

        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.request(request).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
