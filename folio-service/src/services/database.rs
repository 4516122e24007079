//! PostgreSQL store for folio-service.

use crate::models::{
    CustomFieldDef, FolioSummary, FolioWindow, UpsertAction, UpsertFolioWindow, WindowUpsert,
    WorkspaceDef,
};
use crate::services::metrics::{DB_QUERY_DURATION, ERRORS_TOTAL, WINDOW_UPSERTS_TOTAL};
use crate::services::store::FolioStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Row shape of the window upsert. `inserted` comes from the `xmax = 0`
/// system-column check, which is true only for a freshly inserted row.
#[derive(FromRow)]
struct UpsertedWindowRow {
    folio_window_id: Uuid,
    folio_id: Uuid,
    window_code: String,
    window_label: String,
    remarks: String,
    total_charges: Decimal,
    total_payments: Decimal,
    balance: Decimal,
    created_utc: DateTime<Utc>,
    inserted: bool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "folio-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run schema migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl FolioStore for Database {
    /// Atomic create-or-update against the (folio_id, window_code) unique
    /// key. On conflict only non-empty label/remarks overwrite the stored
    /// values; totals are never touched here.
    #[instrument(skip(self, input), fields(folio_id = %input.folio_id, window_code = %input.window_code))]
    async fn upsert_window(&self, input: &UpsertFolioWindow) -> Result<WindowUpsert, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_window"])
            .start_timer();

        let folio_window_id = Uuid::new_v4();
        let row = sqlx::query_as::<_, UpsertedWindowRow>(
            r#"
            INSERT INTO folio_windows (
                folio_window_id, folio_id, window_code, window_label, remarks,
                total_charges, total_payments, balance
            )
            VALUES ($1, $2, $3, COALESCE($4::text, ''), COALESCE($5::text, ''), 0, 0, 0)
            ON CONFLICT (folio_id, window_code) DO UPDATE
            SET window_label = COALESCE(NULLIF($4::text, ''), folio_windows.window_label),
                remarks = COALESCE(NULLIF($5::text, ''), folio_windows.remarks)
            RETURNING folio_window_id, folio_id, window_code, window_label, remarks,
                total_charges, total_payments, balance, created_utc,
                (xmax = 0) AS inserted
            "#,
        )
        .bind(folio_window_id)
        .bind(input.folio_id)
        .bind(&input.window_code)
        .bind(&input.window_label)
        .bind(&input.remarks)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(anyhow::anyhow!("Folio {} not found", input.folio_id))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to upsert folio window: {}", e)),
        })?;

        timer.observe_duration();

        let action = if row.inserted {
            UpsertAction::Created
        } else {
            UpsertAction::Updated
        };
        WINDOW_UPSERTS_TOTAL
            .with_label_values(&[action.as_str()])
            .inc();

        let window = FolioWindow {
            folio_window_id: row.folio_window_id,
            folio_id: row.folio_id,
            window_code: row.window_code,
            window_label: row.window_label,
            remarks: row.remarks,
            total_charges: row.total_charges,
            total_payments: row.total_payments,
            balance: row.balance,
            created_utc: row.created_utc,
        };

        info!(
            folio_window_id = %window.folio_window_id,
            action = action.as_str(),
            "Folio window upserted"
        );

        Ok(WindowUpsert { window, action })
    }

    /// List folio projections, optionally filtered by status.
    #[instrument(skip(self))]
    async fn list_folios(&self, status: Option<&str>) -> Result<Vec<FolioSummary>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_folios"])
            .start_timer();

        let folios = sqlx::query_as::<_, FolioSummary>(
            r#"
            SELECT folio_id, reservation_id, guest_id, status, check_in_date, check_out_date,
                cashier_id, total_charges, total_payments, balance
            FROM folios
            WHERE ($1::text IS NULL OR status = $1)
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list folios: {}", e)))?;

        timer.observe_duration();

        Ok(folios)
    }

    /// Build the nested folio detail document in a single query: the folio,
    /// at most one invoice (arbitrary tie-break), and per window its line
    /// items plus charge and payment sums. Windows without line items on the
    /// selected invoice are excluded.
    #[instrument(skip(self), fields(folio_id = %folio_id))]
    async fn find_folio(&self, folio_id: Uuid) -> Result<Option<serde_json::Value>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_folio"])
            .start_timer();

        let detail = sqlx::query_scalar::<_, serde_json::Value>(
            r#"
            SELECT json_build_object(
                'folio_id', f.folio_id,
                'reservation_id', f.reservation_id,
                'guest_id', f.guest_id,
                'status', f.status,
                'check_in_date', f.check_in_date,
                'check_out_date', f.check_out_date,
                'invoice',
                (
                    SELECT json_build_object(
                        'invoice_id', i.invoice_id,
                        'invoice_date', i.posting_date,
                        'windows',
                        (
                            SELECT COALESCE(
                                json_agg(
                                    json_build_object(
                                        'window_id', fw.folio_window_id,
                                        'window_code', fw.window_code,

                                        -- Items per window
                                        'items',
                                        (
                                            SELECT COALESCE(
                                                json_agg(
                                                    json_build_object(
                                                        'line_item_id', li.line_item_id,
                                                        'item_code', li.item_code,
                                                        'item_name', li.item_name,
                                                        'quantity', li.quantity,
                                                        'rate', li.rate,
                                                        'amount', li.amount
                                                    )
                                                ), '[]'::json
                                            )
                                            FROM invoice_line_items li
                                            WHERE li.invoice_id = i.invoice_id
                                              AND li.folio_window_id = fw.folio_window_id
                                        ),

                                        -- Total amount per window
                                        'total_amount',
                                        (
                                            SELECT COALESCE(SUM(li.amount), 0)
                                            FROM invoice_line_items li
                                            WHERE li.invoice_id = i.invoice_id
                                              AND li.folio_window_id = fw.folio_window_id
                                        ),

                                        -- Total paid per window
                                        'total_paid',
                                        (
                                            SELECT COALESCE(SUM(p.amount), 0)
                                            FROM payments p
                                            WHERE p.invoice_id = i.invoice_id
                                              AND p.folio_window_id = fw.folio_window_id
                                        )
                                    )
                                ), '[]'::json
                            )
                            FROM folio_windows fw
                            WHERE fw.folio_id = f.folio_id
                              AND EXISTS (
                                  SELECT 1
                                  FROM invoice_line_items li
                                  WHERE li.invoice_id = i.invoice_id
                                    AND li.folio_window_id = fw.folio_window_id
                              )
                        )
                    )
                    FROM invoices i
                    WHERE i.folio_id = f.folio_id
                    LIMIT 1
                )
            ) AS folio_details
            FROM folios f
            WHERE f.folio_id = $1
            "#,
        )
        .bind(folio_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(folio_id = %folio_id, error = %e, "Folio detail query failed");
            ERRORS_TOTAL.with_label_values(&["find_folio"]).inc();
            AppError::DatabaseError(anyhow::anyhow!("Failed to fetch folio details: {}", e))
        })?;

        timer.observe_duration();

        Ok(detail)
    }

    /// Create or replace the workspace record by name.
    #[instrument(skip(self, def), fields(workspace = %def.name))]
    async fn upsert_workspace(&self, def: &WorkspaceDef) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_workspace"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO workspaces (name, label, module, icon, public, hidden, roles, updated_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (name) DO UPDATE
            SET label = EXCLUDED.label,
                module = EXCLUDED.module,
                icon = EXCLUDED.icon,
                public = EXCLUDED.public,
                hidden = EXCLUDED.hidden,
                roles = EXCLUDED.roles,
                updated_utc = NOW()
            "#,
        )
        .bind(&def.name)
        .bind(&def.label)
        .bind(&def.module)
        .bind(&def.icon)
        .bind(def.public)
        .bind(def.hidden)
        .bind(sqlx::types::Json(&def.roles))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to upsert workspace: {}", e))
        })?;

        timer.observe_duration();

        info!(workspace = %def.name, "Workspace upserted");

        Ok(())
    }

    /// Create or replace a custom field by (table_name, field_name).
    #[instrument(skip(self, def), fields(table = %def.table_name, field = %def.field_name))]
    async fn upsert_custom_field(&self, def: &CustomFieldDef) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_custom_field"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO custom_fields (
                custom_field_id, table_name, field_name, label, field_type,
                options, default_value, insert_after
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (table_name, field_name) DO UPDATE
            SET label = EXCLUDED.label,
                field_type = EXCLUDED.field_type,
                options = EXCLUDED.options,
                default_value = EXCLUDED.default_value,
                insert_after = EXCLUDED.insert_after
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&def.table_name)
        .bind(&def.field_name)
        .bind(&def.label)
        .bind(&def.field_type)
        .bind(&def.options)
        .bind(&def.default_value)
        .bind(&def.insert_after)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to upsert custom field: {}", e))
        })?;

        timer.observe_duration();

        Ok(())
    }

    /// Execute a SQL script as one batch, outside any open transaction.
    #[instrument(skip(self, sql))]
    async fn execute_script(&self, sql: &str) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["execute_script"])
            .start_timer();

        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to execute SQL script: {}", e))
            })?;

        timer.observe_duration();

        Ok(())
    }

    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }
}
