//! Backend selection from the environment.

use std::path::PathBuf;

use crate::StorageError;

/// Default on-disk location for receipt images.
pub const DEFAULT_FS_ROOT: &str = "./data/receipt_images";

#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub allow_http: bool,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub virtual_hosted_style: bool,
}

#[derive(Debug, Clone)]
pub enum StorageBackendConfig {
    S3(S3Config),
    Filesystem { root: PathBuf },
    Memory,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackendConfig,
    /// Optional key prefix applied to all object keys.
    pub prefix: Option<String>,
}

impl StorageConfig {
    pub fn memory() -> Self {
        Self {
            backend: StorageBackendConfig::Memory,
            prefix: None,
        }
    }

    pub fn filesystem(root: impl Into<PathBuf>) -> Self {
        Self {
            backend: StorageBackendConfig::Filesystem { root: root.into() },
            prefix: None,
        }
    }

    pub fn s3(cfg: S3Config) -> Self {
        Self {
            backend: StorageBackendConfig::S3(cfg),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = non_empty(prefix.into());
        self
    }

    /// Build a config from environment variables.
    ///
    /// `STORAGE_BACKEND` picks `s3`, `filesystem` or `memory`; unset means
    /// filesystem under `STORAGE_FS_ROOT` (default [`DEFAULT_FS_ROOT`]).
    ///
    /// The S3 backend reads `S3_BUCKET` (required), `AWS_REGION`
    /// (default `us-east-1`), `S3_ENDPOINT`, `S3_ALLOW_HTTP`,
    /// `S3_VIRTUAL_HOSTED_STYLE` and the usual `AWS_*` credentials.
    ///
    /// `STORAGE_PREFIX` is prepended to every key.
    pub fn from_env() -> Result<Self, StorageError> {
        let prefix = env_value("STORAGE_PREFIX");

        let cfg = match env_value("STORAGE_BACKEND").as_deref() {
            Some("s3") => Self::s3(read_s3_config()?),
            Some("filesystem") | Some("fs") | None => Self::filesystem(
                env_value("STORAGE_FS_ROOT").unwrap_or_else(|| DEFAULT_FS_ROOT.to_string()),
            ),
            Some("memory") | Some("mem") => Self::memory(),
            Some(other) => {
                return Err(StorageError::InvalidConfig(format!(
                    "unsupported STORAGE_BACKEND={other} (expected s3|filesystem|memory)"
                )));
            }
        };

        Ok(Self { prefix, ..cfg })
    }
}

pub(crate) fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(non_empty)
}

fn parse_bool(var_name: &str, raw: &str) -> Result<bool, StorageError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" => Ok(false),
        _ => Err(StorageError::InvalidConfig(format!(
            "invalid boolean for {var_name}={raw} (expected true/false)"
        ))),
    }
}

fn env_bool(var_name: &str) -> Result<Option<bool>, StorageError> {
    env_value(var_name)
        .map(|raw| parse_bool(var_name, &raw))
        .transpose()
}

fn read_s3_config() -> Result<S3Config, StorageError> {
    let bucket = env_value("S3_BUCKET").ok_or_else(|| {
        StorageError::InvalidConfig("S3_BUCKET is required for s3 backend".into())
    })?;
    let endpoint = env_value("S3_ENDPOINT");
    let allow_http = match env_bool("S3_ALLOW_HTTP")? {
        Some(v) => v,
        None => endpoint
            .as_deref()
            .is_some_and(|e| e.to_ascii_lowercase().starts_with("http://")),
    };

    Ok(S3Config {
        bucket,
        region: env_value("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
        endpoint,
        allow_http,
        access_key_id: env_value("AWS_ACCESS_KEY_ID"),
        secret_access_key: env_value("AWS_SECRET_ACCESS_KEY"),
        session_token: env_value("AWS_SESSION_TOKEN"),
        virtual_hosted_style: env_bool("S3_VIRTUAL_HOSTED_STYLE")?.unwrap_or(false),
    })
}

pub(crate) fn build_s3(cfg: S3Config) -> Result<object_store::aws::AmazonS3, StorageError> {
    let mut builder = object_store::aws::AmazonS3Builder::new()
        .with_bucket_name(cfg.bucket)
        .with_region(cfg.region)
        .with_virtual_hosted_style_request(cfg.virtual_hosted_style);

    if let Some(endpoint) = cfg.endpoint {
        builder = builder.with_endpoint(endpoint);
    }
    if cfg.allow_http {
        builder = builder.with_allow_http(true);
    }
    if let Some(access_key_id) = cfg.access_key_id {
        builder = builder.with_access_key_id(access_key_id);
    }
    if let Some(secret_access_key) = cfg.secret_access_key {
        builder = builder.with_secret_access_key(secret_access_key);
    }
    if let Some(session_token) = cfg.session_token {
        builder = builder.with_token(session_token);
    }

    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn booleans() {
        assert!(parse_bool("X", "Yes").unwrap());
        assert!(!parse_bool("X", " 0 ").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn prefix_is_trimmed() {
        let cfg = StorageConfig::memory().with_prefix("  ");
        assert!(cfg.prefix.is_none());
        let cfg = StorageConfig::memory().with_prefix(" portal/ ");
        assert_eq!(cfg.prefix.as_deref(), Some("portal/"));
    }
}
