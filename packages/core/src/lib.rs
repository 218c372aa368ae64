//! Core domain types for the expense portal.
//!
//! This crate contains shared types and pure logic used across all packages:
//! - Account requests, roles and profiles
//! - Expense receipts and their review workflow
//! - Keyword classification and ledger folders
//! - Ledger view derivation (filter, sort, month grouping, selection, export)
//! - OCR wire types and text extraction
//! - Lightbox zoom/pan model
//! - Events for real-time updates

mod account;
mod classify;
mod error;
mod events;
pub mod ledger;
pub mod lightbox;
pub mod ocr;
mod profile;
mod receipt;
mod upload;

pub use account::{
    AccountId, AccountRequest, MIN_PASSWORD_LEN, NewAccountRequest, RequestStatus, Role, Session,
};
pub use classify::{Folder, classify};
pub use error::ValidationError;
pub use events::PortalEvent;
pub use ledger::{LedgerFilter, LedgerQuery, LedgerView, Selection, SortDirection, SortKey, SortState};
pub use profile::{Profile, ProfileDraft};
pub use receipt::{
    DEFAULT_CURRENCY, ExpenseCategory, ExpenseReceipt, ReceiptEdit, ReceiptId, ReceiptImage,
    ReceiptMetadata, ReceiptStatus, StatusTone, extension_for_content_type, parse_amount,
    split_duplicates,
};
pub use upload::{
    MAX_IMAGE_BYTES, MAX_UPLOAD_IMAGES, UploadBatch, UploadImage, UploadOutcome, data_url,
};
