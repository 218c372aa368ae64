//! The shared SurrealDB handle.

use std::sync::LazyLock;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use thiserror::Error;
use tokio::sync::OnceCell;

static DB: LazyLock<OnceCell<Surreal<Any>>> = LazyLock::new(OnceCell::new);

pub type Database = Surreal<Any>;

/// Endpoint used on Railway when no endpoint is configured.
pub const DEPLOYED_ENDPOINT: &str = "file://./data/surrealdb";

/// Where the portal keeps its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// `mem://`, `file://path`, `rocksdb://path` or a remote `ws://` URL.
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    /// Root user and password for remote servers.
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "portal".to_string(),
            database: "main".to_string(),
            credentials: None,
        }
    }
}

impl DbConfig {
    /// In-memory store, used by tests and local runs.
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Resolve the `PORTAL_DB_*` variables.
    ///
    /// Without `PORTAL_DB_ENDPOINT` the store is in memory, unless
    /// `RAILWAY_ENVIRONMENT` is set, in which case it lives on disk.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let endpoint = var("PORTAL_DB_ENDPOINT").unwrap_or_else(|| {
            if lookup("RAILWAY_ENVIRONMENT").is_some() {
                DEPLOYED_ENDPOINT.to_string()
            } else {
                defaults.endpoint.clone()
            }
        });

        Self {
            endpoint,
            namespace: var("PORTAL_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: var("PORTAL_DB_DATABASE").unwrap_or(defaults.database),
            credentials: var("PORTAL_DB_USERNAME").zip(var("PORTAL_DB_PASSWORD")),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database not initialized")]
    NotInitialized,
    #[error("Connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Connect once; later calls return the existing handle and ignore `config`.
pub async fn init_db(config: DbConfig) -> Result<&'static Database, DbError> {
    DB.get_or_try_init(|| async {
        tracing::info!(endpoint = %config.endpoint, "Opening portal store");

        let db = connect(&config.endpoint).await?;
        if let Some((username, password)) = &config.credentials {
            db.signin(Root { username, password }).await?;
        }
        db.use_ns(&config.namespace).use_db(&config.database).await?;

        tracing::info!("Using {}/{}", config.namespace, config.database);
        Ok(db)
    })
    .await
}

pub fn get_db() -> Result<&'static Database, DbError> {
    DB.get().ok_or(DbError::NotInitialized)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use std::collections::HashMap;

    fn resolve(vars: &[(&str, &str)]) -> DbConfig {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        DbConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn defaults_to_memory() {
        assert_eq!(resolve(&[]), DbConfig::memory());
    }

    #[test]
    fn railway_uses_disk_unless_overridden() {
        let cfg = resolve(&[("RAILWAY_ENVIRONMENT", "production")]);
        assert_eq!(cfg.endpoint, DEPLOYED_ENDPOINT);

        let cfg = resolve(&[
            ("RAILWAY_ENVIRONMENT", "production"),
            ("PORTAL_DB_ENDPOINT", "ws://db:8000"),
            ("PORTAL_DB_NAMESPACE", "acme"),
        ]);
        assert_eq!(cfg.endpoint, "ws://db:8000");
        assert_eq!(cfg.namespace, "acme");
        assert_eq!(cfg.database, "main");
    }

    #[test]
    fn credentials_need_both_parts() {
        assert_eq!(resolve(&[("PORTAL_DB_USERNAME", "root")]).credentials, None);
        assert_eq!(
            resolve(&[("PORTAL_DB_USERNAME", "root"), ("PORTAL_DB_PASSWORD", "pw")]).credentials,
            Some(("root".to_string(), "pw".to_string()))
        );
    }
}
