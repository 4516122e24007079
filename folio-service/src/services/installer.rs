//! Install and migrate lifecycle routines.
//!
//! `after_install` seeds the desk workspace; `after_migrate` re-runs the
//! workspace upsert, installs custom field definitions, and executes the
//! auxiliary SQL scripts. Every step is an upsert or a re-runnable script,
//! so both hooks are safe to run repeatedly.

use crate::config::InstallerConfig;
use crate::models::{CustomFieldDef, WorkspaceDef};
use crate::services::store::FolioStore;
use service_core::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

const WORKSPACE_NAME: &str = "Billing";
const MODULE_NAME: &str = "Billing";
const WORKSPACE_ICON: &str = "wallet";
const ADMIN_ROLE: &str = "System Manager";

pub struct Installer {
    store: Arc<dyn FolioStore>,
    customfields_dir: PathBuf,
    sql_dir: PathBuf,
}

impl Installer {
    pub fn new(store: Arc<dyn FolioStore>, config: &InstallerConfig) -> Self {
        Self {
            store,
            customfields_dir: config.customfields_dir.clone(),
            sql_dir: config.sql_dir.clone(),
        }
    }

    /// Runs once when the service is first installed.
    #[instrument(skip(self))]
    pub async fn after_install(&self) -> Result<(), AppError> {
        self.upsert_workspace().await
    }

    /// Runs on every migrate so setup changes apply during development.
    #[instrument(skip(self))]
    pub async fn after_migrate(&self) -> Result<(), AppError> {
        self.upsert_workspace().await?;
        self.install_custom_fields().await?;
        self.run_sql_scripts().await?;
        Ok(())
    }

    /// Upsert the fixed Billing workspace, visible to the administrative
    /// role only.
    async fn upsert_workspace(&self) -> Result<(), AppError> {
        let def = WorkspaceDef {
            name: WORKSPACE_NAME.to_string(),
            label: WORKSPACE_NAME.to_string(),
            module: MODULE_NAME.to_string(),
            icon: WORKSPACE_ICON.to_string(),
            public: true,
            hidden: false,
            roles: vec![ADMIN_ROLE.to_string()],
        };
        self.store.upsert_workspace(&def).await
    }

    /// Install every custom field definition found in the customfields
    /// directory. Each file holds a JSON array of definitions.
    async fn install_custom_fields(&self) -> Result<(), AppError> {
        let files = sorted_files(&self.customfields_dir, "json")?;
        if files.is_empty() {
            warn!(dir = %self.customfields_dir.display(), "No custom field definitions found");
            return Ok(());
        }

        for path in files {
            let raw = fs::read_to_string(&path)?;
            let defs: Vec<CustomFieldDef> = serde_json::from_str(&raw).map_err(|e| {
                AppError::BadRequest(anyhow::anyhow!(
                    "Invalid custom field file {}: {}",
                    path.display(),
                    e
                ))
            })?;

            for def in &defs {
                self.store.upsert_custom_field(def).await?;
            }
            info!(file = %path.display(), fields = defs.len(), "Custom fields installed");
        }

        Ok(())
    }

    /// Execute every SQL script in the sql directory, in lexical filename
    /// order. Scripts handle their own statement delimiters.
    async fn run_sql_scripts(&self) -> Result<(), AppError> {
        let files = sorted_files(&self.sql_dir, "sql")?;
        for path in files {
            let sql = fs::read_to_string(&path)?;
            self.store.execute_script(&sql).await?;
            info!(file = %path.display(), "SQL script executed");
        }
        Ok(())
    }
}

/// Files with the given extension in `dir`, sorted by filename. A missing
/// directory is treated as empty.
fn sorted_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    files.sort();
    Ok(files)
}
