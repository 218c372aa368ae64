//! Server API functions for the expense portal.
//!
//! This crate contains all shared fullstack server functions for:
//! - Account requests and sign-in
//! - Receipts (list, edit, delete, submit, review, images)
//! - OCR uploads
//! - Profiles
//! - The admin activity feed

mod accounts;
mod events;
mod ocr;
mod profiles;
mod receipts;

#[cfg(feature = "server")]
mod config;

#[cfg(feature = "server")]
mod init;

#[cfg(feature = "server")]
mod realtime;

#[cfg(feature = "server")]
mod session;

// Re-export all server functions
pub use accounts::*;
pub use events::*;
pub use ocr::*;
pub use profiles::*;
pub use receipts::*;

#[cfg(feature = "server")]
pub use config::{ConfigError, PortalConfig};

#[cfg(feature = "server")]
pub use init::{DEMO_PASSWORD, InitError, ensure_initialized, init_portal, portal_config};

#[cfg(feature = "server")]
pub use realtime::*;

// Re-export core types for convenience
pub use portal_core::{
    AccountId, AccountRequest, ExpenseReceipt, NewAccountRequest, PortalEvent, Profile,
    ProfileDraft, ReceiptEdit, ReceiptId, ReceiptStatus, RequestStatus, Role, Session,
    UploadImage, UploadOutcome,
};
