use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use service_core::config::Config as CoreConfig;
use std::env;
use std::path::PathBuf;

/// Full configuration for folio-service.
#[derive(Debug, Deserialize, Clone)]
pub struct FolioConfig {
    pub common: CoreConfig,
    pub service_name: String,
    pub database: DatabaseConfig,
    pub installer: InstallerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Directories the install/migrate routines read from. Resolved relative to
/// the working directory unless absolute.
#[derive(Debug, Deserialize, Clone)]
pub struct InstallerConfig {
    pub customfields_dir: PathBuf,
    pub sql_dir: PathBuf,
}

impl FolioConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let common = CoreConfig::load()
            .map_err(|e| anyhow::anyhow!("Failed to load server config: {}", e))?;

        let url = env::var("FOLIO_DATABASE_URL").context("FOLIO_DATABASE_URL must be set")?;
        let max_connections = env::var("FOLIO_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("FOLIO_DB_MAX_CONNECTIONS must be an integer")?;
        let min_connections = env::var("FOLIO_DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .context("FOLIO_DB_MIN_CONNECTIONS must be an integer")?;

        let customfields_dir = env::var("FOLIO_CUSTOMFIELDS_DIR")
            .unwrap_or_else(|_| "folio-service/setup/customfields".to_string());
        let sql_dir =
            env::var("FOLIO_SQL_DIR").unwrap_or_else(|_| "folio-service/sql".to_string());

        Ok(Self {
            common,
            service_name: "folio-service".to_string(),
            database: DatabaseConfig {
                url,
                max_connections,
                min_connections,
            },
            installer: InstallerConfig {
                customfields_dir: PathBuf::from(customfields_dir),
                sql_dir: PathBuf::from(sql_dir),
            },
        })
    }
}
