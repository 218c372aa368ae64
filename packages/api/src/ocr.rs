//! Receipt upload server function.

use dioxus::prelude::*;
use portal_core::{UploadImage, UploadOutcome};

/// Upload receipt images for OCR.
///
/// The caller needs a saved profile; its name is stamped on every receipt.
#[post("/api/ocr/upload")]
pub async fn upload_receipts(
    token: String,
    images: Vec<UploadImage>,
) -> Result<UploadOutcome, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use actors::SupervisorMessage;
        use db::repositories::ProfileRepository;
        use portal_core::UploadBatch;

        use crate::session::{call_supervisor, db_error, invalid, require_session};

        let session = require_session(&token).await?;

        let profile = ProfileRepository::find(&session.account_id)
            .await
            .map_err(db_error)?
            .filter(|p| p.is_complete())
            .ok_or_else(|| {
                ServerFnError::new("Please complete your profile before uploading receipts")
            })?;

        let batch = UploadBatch {
            account_id: session.account_id.clone(),
            owner_name: profile.name,
            images,
        };
        batch.validate().map_err(invalid)?;

        tracing::info!(
            "{} uploaded {} image(s) for OCR",
            batch.account_id,
            batch.images.len()
        );

        call_supervisor(|reply| SupervisorMessage::ProcessUpload {
            batch: Box::new(batch),
            reply,
        })
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?
        .map_err(ServerFnError::new)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
