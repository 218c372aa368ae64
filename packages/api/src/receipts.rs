//! Receipt server functions: listing, editing, the review workflow and images.

use dioxus::prelude::*;
use portal_core::{ExpenseReceipt, ReceiptEdit, ReceiptStatus};
use serde::{Deserialize, Serialize};

/// An admin's decision on a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
    Finalize,
}

impl ReviewDecision {
    /// Status the receipt moves to.
    pub fn target(&self) -> ReceiptStatus {
        match self {
            ReviewDecision::Approve => ReceiptStatus::Approved,
            ReviewDecision::Reject => ReceiptStatus::Rejected,
            ReviewDecision::Finalize => ReceiptStatus::Finalized,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "Approve",
            ReviewDecision::Reject => "Reject",
            ReviewDecision::Finalize => "Finalize",
        }
    }
}

#[cfg(feature = "server")]
fn parse_id(id: &str) -> Result<portal_core::ReceiptId, ServerFnError> {
    portal_core::ReceiptId::parse(id)
        .map_err(|e| ServerFnError::new(format!("Invalid receipt ID: {}", e)))
}

/// Delete stored images for removed receipts, logging failures.
#[cfg(feature = "server")]
pub(crate) async fn delete_images(receipts: &[ExpenseReceipt]) {
    let Some(storage) = crate::init::image_storage() else {
        return;
    };
    for image in receipts.iter().filter_map(|r| r.image.as_ref()) {
        if let Err(e) = storage.delete_image(image).await {
            tracing::warn!("Failed to delete image {}: {}", image.key, e);
        }
    }
}

/// List receipts: the caller's own, or every receipt for an admin.
///
/// Admins may narrow the list to one owner.
#[get("/api/receipts")]
pub async fn list_receipts(
    token: String,
    owner: Option<String>,
) -> Result<Vec<ExpenseReceipt>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::ReceiptRepository;
        use portal_core::AccountId;

        use crate::session::{db_error, invalid, require_session};

        let session = require_session(&token).await?;

        let owner = match owner.as_deref().map(str::trim) {
            _ if !session.is_admin() => Some(session.account_id.clone()),
            None | Some("") => None,
            Some(raw) => Some(AccountId::parse(raw).map_err(invalid)?),
        };

        match owner {
            Some(owner) => ReceiptRepository::list_for_account(&owner).await,
            None => ReceiptRepository::list_all().await,
        }
        .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Receipts waiting for an admin: submitted and approved.
#[get("/api/receipts/review-queue")]
pub async fn review_queue(token: String) -> Result<Vec<ExpenseReceipt>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::ReceiptRepository;

        use crate::session::{db_error, require_admin};

        require_admin(&token).await?;
        ReceiptRepository::list_by_status(&[ReceiptStatus::Submitted, ReceiptStatus::Approved])
            .await
            .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Get one receipt.
#[get("/api/receipts/:id")]
pub async fn get_receipt(id: String, token: String) -> Result<ExpenseReceipt, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::ReceiptRepository;

        use crate::session::{db_error, require_owner, require_session};

        let session = require_session(&token).await?;
        let receipt = ReceiptRepository::get(parse_id(&id)?)
            .await
            .map_err(db_error)?;
        require_owner(&session, &receipt.account_id, true)?;
        Ok(receipt)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Apply the owner's edit to a receipt.
#[post("/api/receipts/:id/update")]
pub async fn update_receipt(
    id: String,
    token: String,
    edit: ReceiptEdit,
) -> Result<ExpenseReceipt, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use chrono::Utc;
        use db::repositories::ReceiptRepository;
        use portal_core::PortalEvent;

        use crate::session::{db_error, invalid, publish, require_owner, require_session};

        let session = require_session(&token).await?;
        let mut receipt = ReceiptRepository::get(parse_id(&id)?)
            .await
            .map_err(db_error)?;
        require_owner(&session, &receipt.account_id, false)?;

        let old_status = receipt.status;
        let now = Utc::now();
        edit.apply(&mut receipt, now).map_err(invalid)?;

        let updated = ReceiptRepository::update(&receipt)
            .await
            .map_err(db_error)?;

        publish(PortalEvent::ReceiptEdited {
            receipt_id: updated.id,
            account_id: updated.account_id.clone(),
            timestamp: now,
        });
        if old_status != updated.status {
            publish(PortalEvent::ReceiptStatusChanged {
                receipt_id: updated.id,
                account_id: updated.account_id.clone(),
                old_status,
                new_status: updated.status,
                timestamp: now,
            });
        }

        Ok(updated)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Delete a receipt and its stored image.
#[post("/api/receipts/:id/delete")]
pub async fn delete_receipt(id: String, token: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use chrono::Utc;
        use db::repositories::ReceiptRepository;
        use portal_core::PortalEvent;

        use crate::session::{db_error, invalid, publish, require_owner, require_session};

        let session = require_session(&token).await?;
        let receipt_id = parse_id(&id)?;
        let receipt = ReceiptRepository::get(receipt_id)
            .await
            .map_err(db_error)?;
        require_owner(&session, &receipt.account_id, false)?;
        receipt.ensure_owner_editable().map_err(invalid)?;

        let removed = ReceiptRepository::delete(receipt_id)
            .await
            .map_err(db_error)?;
        delete_images(std::slice::from_ref(&removed)).await;

        publish(PortalEvent::ReceiptDeleted {
            receipt_id,
            account_id: removed.account_id,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Send a receipt for review.
#[post("/api/receipts/:id/submit")]
pub async fn submit_receipt(id: String, token: String) -> Result<ExpenseReceipt, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let session = crate::session::require_session(&token).await?;
        transition(&id, &session, ReceiptStatus::Submitted, None, false).await
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Approve, reject or finalize a receipt.
#[post("/api/receipts/:id/review")]
pub async fn review_receipt(
    id: String,
    token: String,
    decision: ReviewDecision,
    note: Option<String>,
) -> Result<ExpenseReceipt, ServerFnError> {
    #[cfg(feature = "server")]
    {
        let session = crate::session::require_admin(&token).await?;
        transition(&id, &session, decision.target(), note, true).await
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

#[cfg(feature = "server")]
async fn transition(
    id: &str,
    session: &portal_core::Session,
    next: ReceiptStatus,
    note: Option<String>,
    as_admin: bool,
) -> Result<ExpenseReceipt, ServerFnError> {
    use chrono::Utc;
    use db::repositories::ReceiptRepository;
    use portal_core::PortalEvent;

    use crate::session::{db_error, invalid, publish, require_owner};

    let mut receipt = ReceiptRepository::get(parse_id(id)?)
        .await
        .map_err(db_error)?;
    if !as_admin {
        require_owner(session, &receipt.account_id, false)?;
    }

    let now = Utc::now();
    let old_status = receipt.transition(next, note, now).map_err(invalid)?;
    let updated = ReceiptRepository::update(&receipt)
        .await
        .map_err(db_error)?;

    publish(PortalEvent::ReceiptStatusChanged {
        receipt_id: updated.id,
        account_id: updated.account_id.clone(),
        old_status,
        new_status: updated.status,
        timestamp: now,
    });
    Ok(updated)
}

/// The receipt image as a `data:` URL, or `None` when the receipt has no image.
#[get("/api/receipts/:id/image")]
pub async fn receipt_image(id: String, token: String) -> Result<Option<String>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::ReceiptRepository;
        use portal_core::data_url;

        use crate::session::{db_error, require_owner, require_session};

        let session = require_session(&token).await?;
        let receipt = ReceiptRepository::get(parse_id(&id)?)
            .await
            .map_err(db_error)?;
        require_owner(&session, &receipt.account_id, true)?;

        let Some(image) = receipt.image else {
            return Ok(None);
        };
        let storage = crate::init::image_storage()
            .ok_or_else(|| ServerFnError::new("Image storage is not available"))?;

        match storage.get_image(&image).await {
            Ok(bytes) => Ok(Some(data_url(&image.content_type, &bytes))),
            Err(storage::StorageError::NotFound(_)) => {
                tracing::warn!("Image for receipt {} is missing from storage", receipt.id);
                Ok(None)
            }
            Err(e) => Err(ServerFnError::new(format!("Failed to load image: {}", e))),
        }
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn decisions_follow_the_workflow() {
        let parsed_ok = |d: ReviewDecision| ReceiptStatus::Submitted.can_transition_to(d.target());
        assert!(parsed_ok(ReviewDecision::Approve));
        assert!(parsed_ok(ReviewDecision::Reject));
        assert!(!parsed_ok(ReviewDecision::Finalize));
        assert!(ReceiptStatus::Approved.can_transition_to(ReviewDecision::Finalize.target()));
    }
}
