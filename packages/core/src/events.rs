//! Event types for real-time updates and the admin activity feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, ReceiptId, ReceiptStatus};

/// Events emitted by the portal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PortalEvent {
    // Account events
    /// Someone asked for an account.
    AccountRequested {
        account_id: AccountId,
        full_name: String,
        timestamp: DateTime<Utc>,
    },
    /// An admin approved an account request.
    AccountApproved {
        account_id: AccountId,
        timestamp: DateTime<Utc>,
    },
    /// An admin rejected an account request.
    AccountRejected {
        account_id: AccountId,
        receipts_removed: usize,
        timestamp: DateTime<Utc>,
    },

    // Receipt events
    /// An upload finished processing.
    ReceiptsExtracted {
        account_id: AccountId,
        created: usize,
        duplicates: usize,
        unreadable: usize,
        timestamp: DateTime<Utc>,
    },
    /// The OCR service could not process an upload.
    OcrFailed {
        account_id: AccountId,
        error: String,
        timestamp: DateTime<Utc>,
    },
    /// A receipt moved through the review workflow.
    ReceiptStatusChanged {
        receipt_id: ReceiptId,
        account_id: AccountId,
        old_status: ReceiptStatus,
        new_status: ReceiptStatus,
        timestamp: DateTime<Utc>,
    },
    /// The owner edited a receipt.
    ReceiptEdited {
        receipt_id: ReceiptId,
        account_id: AccountId,
        timestamp: DateTime<Utc>,
    },
    /// The owner deleted a receipt.
    ReceiptDeleted {
        receipt_id: ReceiptId,
        account_id: AccountId,
        timestamp: DateTime<Utc>,
    },

    // Profile events
    ProfileSaved {
        account_id: AccountId,
        timestamp: DateTime<Utc>,
    },
}

impl PortalEvent {
    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            PortalEvent::AccountRequested { timestamp, .. } => *timestamp,
            PortalEvent::AccountApproved { timestamp, .. } => *timestamp,
            PortalEvent::AccountRejected { timestamp, .. } => *timestamp,
            PortalEvent::ReceiptsExtracted { timestamp, .. } => *timestamp,
            PortalEvent::OcrFailed { timestamp, .. } => *timestamp,
            PortalEvent::ReceiptStatusChanged { timestamp, .. } => *timestamp,
            PortalEvent::ReceiptEdited { timestamp, .. } => *timestamp,
            PortalEvent::ReceiptDeleted { timestamp, .. } => *timestamp,
            PortalEvent::ProfileSaved { timestamp, .. } => *timestamp,
        }
    }

    /// Get the account the event concerns.
    pub fn account_id(&self) -> &AccountId {
        match self {
            PortalEvent::AccountRequested { account_id, .. }
            | PortalEvent::AccountApproved { account_id, .. }
            | PortalEvent::AccountRejected { account_id, .. }
            | PortalEvent::ReceiptsExtracted { account_id, .. }
            | PortalEvent::OcrFailed { account_id, .. }
            | PortalEvent::ReceiptStatusChanged { account_id, .. }
            | PortalEvent::ReceiptEdited { account_id, .. }
            | PortalEvent::ReceiptDeleted { account_id, .. }
            | PortalEvent::ProfileSaved { account_id, .. } => account_id,
        }
    }

    /// Get the receipt ID associated with this event, if any.
    pub fn receipt_id(&self) -> Option<ReceiptId> {
        match self {
            PortalEvent::ReceiptStatusChanged { receipt_id, .. } => Some(*receipt_id),
            PortalEvent::ReceiptEdited { receipt_id, .. } => Some(*receipt_id),
            PortalEvent::ReceiptDeleted { receipt_id, .. } => Some(*receipt_id),
            _ => None,
        }
    }

    /// Get a short description of this event for logging and the activity feed.
    pub fn description(&self) -> String {
        match self {
            PortalEvent::AccountRequested {
                account_id,
                full_name,
                ..
            } => format!("{} ({}) requested an account", full_name, account_id),
            PortalEvent::AccountApproved { account_id, .. } => {
                format!("Account {} approved", account_id)
            }
            PortalEvent::AccountRejected {
                account_id,
                receipts_removed,
                ..
            } => {
                if *receipts_removed > 0 {
                    format!(
                        "Account {} rejected, {} receipt(s) removed",
                        account_id, receipts_removed
                    )
                } else {
                    format!("Account {} rejected", account_id)
                }
            }
            PortalEvent::ReceiptsExtracted {
                account_id,
                created,
                duplicates,
                unreadable,
                ..
            } => format!(
                "{} uploaded receipts: {} added, {} duplicate, {} unreadable",
                account_id, created, duplicates, unreadable
            ),
            PortalEvent::OcrFailed {
                account_id, error, ..
            } => format!("OCR failed for {}: {}", account_id, error),
            PortalEvent::ReceiptStatusChanged {
                receipt_id,
                old_status,
                new_status,
                ..
            } => format!("Receipt {} {} -> {}", receipt_id, old_status, new_status),
            PortalEvent::ReceiptEdited { receipt_id, .. } => {
                format!("Receipt {} edited", receipt_id)
            }
            PortalEvent::ReceiptDeleted { receipt_id, .. } => {
                format!("Receipt {} deleted", receipt_id)
            }
            PortalEvent::ProfileSaved { account_id, .. } => {
                format!("Profile saved for {}", account_id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = PortalEvent::AccountRejected {
            account_id: AccountId::parse("emp-007").unwrap(),
            receipts_removed: 2,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "account_rejected");
        assert_eq!(json["receipts_removed"], 2);

        let back: PortalEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn status_change_describes_both_ends() {
        let receipt_id = ReceiptId::new();
        let event = PortalEvent::ReceiptStatusChanged {
            receipt_id,
            account_id: AccountId::parse("emp-007").unwrap(),
            old_status: ReceiptStatus::Submitted,
            new_status: ReceiptStatus::Approved,
            timestamp: Utc::now(),
        };
        assert_eq!(event.receipt_id(), Some(receipt_id));
        assert_eq!(
            event.description(),
            format!("Receipt {} Submitted -> Approved", receipt_id)
        );
        assert_eq!(event.account_id().as_str(), "emp-007");
    }
}
