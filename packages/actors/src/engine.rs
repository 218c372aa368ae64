//! OCR engines: the HTTP client for the external service and a closure-based
//! engine for tests and local runs.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use portal_core::ocr::{InvalidOcrResponse, OcrRequest, OcrResponse};

/// Result type for OCR engines.
pub type EngineResult = Result<OcrResponse, OcrError>;

/// Future type for async OCR engines.
pub type EngineFuture = Pin<Box<dyn Future<Output = EngineResult> + Send>>;

/// Errors raised while talking to an OCR engine.
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR service is not configured (set OCR_ENDPOINT_URL)")]
    NotConfigured,

    #[error("OCR request failed: {0}")]
    Request(String),

    #[error("OCR service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    InvalidResponse(#[from] InvalidOcrResponse),

    #[error("OCR request timed out after {0} s")]
    Timeout(u64),
}

impl From<reqwest::Error> for OcrError {
    fn from(err: reqwest::Error) -> Self {
        OcrError::Request(err.to_string())
    }
}

/// Something that turns receipt images into text.
pub trait OcrEngine: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Recognize every image in the request.
    fn recognize(&self, request: OcrRequest) -> EngineFuture;
}

/// Engine backed by the external OCR HTTP service.
pub struct HttpOcrEngine {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpOcrEngine {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, OcrError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

impl OcrEngine for HttpOcrEngine {
    fn name(&self) -> &str {
        "http"
    }

    fn recognize(&self, request: OcrRequest) -> EngineFuture {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        Box::pin(async move {
            tracing::debug!(
                "Sending {} image(s) for {} to OCR service",
                request.images.len(),
                request.account_id
            );
            let response = client.post(&endpoint).json(&request).send().await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(OcrError::Status {
                    status: status.as_u16(),
                    body: body.chars().take(200).collect(),
                });
            }
            Ok(OcrResponse::from_json(&body)?)
        })
    }
}

/// Engine used when no OCR endpoint is configured. Every call fails.
pub struct UnconfiguredEngine;

impl OcrEngine for UnconfiguredEngine {
    fn name(&self) -> &str {
        "unconfigured"
    }

    fn recognize(&self, _request: OcrRequest) -> EngineFuture {
        Box::pin(async { Err(OcrError::NotConfigured) })
    }
}

/// A simple function-based engine.
pub struct FnEngine<F>
where
    F: Fn(OcrRequest) -> EngineFuture + Send + Sync + 'static,
{
    name: String,
    engine: F,
}

impl<F> FnEngine<F>
where
    F: Fn(OcrRequest) -> EngineFuture + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, engine: F) -> Self {
        Self {
            name: name.into(),
            engine,
        }
    }
}

impl<F> OcrEngine for FnEngine<F>
where
    F: Fn(OcrRequest) -> EngineFuture + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn recognize(&self, request: OcrRequest) -> EngineFuture {
        (self.engine)(request)
    }
}

/// Build an engine from an optional endpoint URL.
pub fn engine_for_endpoint(
    endpoint: Option<&str>,
    timeout: Duration,
) -> Result<std::sync::Arc<dyn OcrEngine>, OcrError> {
    match endpoint {
        Some(url) => Ok(std::sync::Arc::new(HttpOcrEngine::new(url, timeout)?)),
        None => {
            tracing::warn!("OCR_ENDPOINT_URL is not set; receipt uploads will fail");
            Ok(std::sync::Arc::new(UnconfiguredEngine))
        }
    }
}
