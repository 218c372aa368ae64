//! Repository implementations for database operations.

mod account_repo;
mod credential_repo;
mod profile_repo;
mod receipt_repo;

pub use account_repo::AccountRequestRepository;
pub use credential_repo::{CredentialRepository, SessionRepository};
pub use profile_repo::ProfileRepository;
pub use receipt_repo::ReceiptRepository;
