//! Server configuration read from the environment.

use std::time::Duration;

use db::DbConfig;
use storage::StorageConfig;

/// Default OCR request timeout.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

/// Default OCR worker pool size.
pub const DEFAULT_OCR_WORKERS: usize = 2;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Storage(#[from] storage::StorageError),
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub db: DbConfig,
    pub storage: StorageConfig,
    pub ocr_endpoint: Option<String>,
    pub ocr_timeout: Duration,
    pub ocr_workers: usize,
    pub admin_id: String,
    pub admin_password: String,
    /// Seed demo receipts and requests into an empty store.
    pub seed_demo: bool,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), StorageConfig::from_env()?)
    }

    /// Build a config from any variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        storage: StorageConfig,
    ) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let db = DbConfig::from_lookup(&lookup);

        let ocr_timeout_secs = match var("OCR_REQUEST_TIMEOUT_SECS") {
            Some(raw) => parse_number("OCR_REQUEST_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_OCR_TIMEOUT_SECS,
        };
        let ocr_workers = match var("OCR_WORKERS") {
            Some(raw) => parse_number("OCR_WORKERS", &raw)?,
            None => DEFAULT_OCR_WORKERS,
        };
        let seed_demo = match var("PORTAL_SEED_DEMO") {
            Some(raw) => parse_flag("PORTAL_SEED_DEMO", &raw)?,
            None => true,
        };

        Ok(Self {
            db,
            storage,
            ocr_endpoint: var("OCR_ENDPOINT_URL"),
            ocr_timeout: Duration::from_secs(ocr_timeout_secs.max(1)),
            ocr_workers: ocr_workers.max(1),
            admin_id: var("PORTAL_ADMIN_ID").unwrap_or_else(|| "admin".to_string()),
            admin_password: var("PORTAL_ADMIN_PASSWORD").unwrap_or_else(|| "admin123".to_string()),
            seed_demo,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<PortalConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PortalConfig::from_lookup(|name| vars.get(name).cloned(), StorageConfig::memory())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.db.endpoint, "mem://");
        assert_eq!(cfg.db.namespace, "portal");
        assert_eq!(cfg.ocr_timeout, Duration::from_secs(60));
        assert_eq!(cfg.ocr_workers, 2);
        assert_eq!(cfg.admin_id, "admin");
        assert!(cfg.ocr_endpoint.is_none());
        assert!(cfg.seed_demo);
    }

    #[test]
    fn railway_uses_file_storage() {
        let cfg = config(&[("RAILWAY_ENVIRONMENT", "production")]).unwrap();
        assert_eq!(cfg.db.endpoint, "file://./data/surrealdb");
        let cfg = config(&[
            ("RAILWAY_ENVIRONMENT", "production"),
            ("PORTAL_DB_ENDPOINT", "rocksdb://db"),
        ])
        .unwrap();
        assert_eq!(cfg.db.endpoint, "rocksdb://db");
    }

    #[test]
    fn overrides_and_bad_values() {
        let cfg = config(&[
            ("OCR_ENDPOINT_URL", " https://ocr.example.com/v1 "),
            ("OCR_WORKERS", "0"),
            ("PORTAL_SEED_DEMO", "off"),
        ])
        .unwrap();
        assert_eq!(cfg.ocr_endpoint.as_deref(), Some("https://ocr.example.com/v1"));
        assert_eq!(cfg.ocr_workers, 1);
        assert!(!cfg.seed_demo);

        assert!(config(&[("OCR_WORKERS", "many")]).is_err());
        assert!(config(&[("PORTAL_SEED_DEMO", "perhaps")]).is_err());
    }
}
