//! Account request repository.

use portal_core::{AccountId, AccountRequest, RequestStatus};

use crate::{DbError, get_db};

/// Repository for account request persistence operations.
pub struct AccountRequestRepository;

impl AccountRequestRepository {
    /// Store a new request. Fails with [`DbError::Conflict`] if the account ID is taken.
    pub async fn create(request: &AccountRequest) -> Result<AccountRequest, DbError> {
        let db = get_db()?;

        if Self::exists(&request.account_id).await? {
            return Err(DbError::Conflict(format!(
                "Account ID '{}' is already taken",
                request.account_id
            )));
        }

        let record: Option<AccountRequest> = db
            .create(("account_request", request.account_id.as_str()))
            .content(request.clone())
            .await?;

        record.ok_or_else(|| DbError::Query("Failed to create account request".into()))
    }

    /// Get a request by account ID.
    pub async fn get(account_id: &AccountId) -> Result<AccountRequest, DbError> {
        let db = get_db()?;

        let record: Option<AccountRequest> =
            db.select(("account_request", account_id.as_str())).await?;

        record.ok_or_else(|| DbError::NotFound(format!("Account request not found: {}", account_id)))
    }

    /// Check if a request exists for the account ID.
    pub async fn exists(account_id: &AccountId) -> Result<bool, DbError> {
        let db = get_db()?;
        let record: Option<AccountRequest> =
            db.select(("account_request", account_id.as_str())).await?;
        Ok(record.is_some())
    }

    /// List requests, newest first, optionally filtered by status.
    pub async fn list(status: Option<RequestStatus>) -> Result<Vec<AccountRequest>, DbError> {
        let db = get_db()?;

        let mut records: Vec<AccountRequest> = match status {
            Some(status) => {
                let mut result = db
                    .query("SELECT * FROM account_request WHERE status = $status")
                    .bind(("status", status.as_str()))
                    .await?;
                result.take(0)?
            }
            None => db.select("account_request").await?,
        };

        records.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(records)
    }

    /// Persist a reviewed request.
    pub async fn update(request: &AccountRequest) -> Result<AccountRequest, DbError> {
        let db = get_db()?;

        let record: Option<AccountRequest> = db
            .update(("account_request", request.account_id.as_str()))
            .content(request.clone())
            .await?;

        record.ok_or_else(|| {
            DbError::NotFound(format!("Account request not found: {}", request.account_id))
        })
    }

    /// Delete a request.
    pub async fn delete(account_id: &AccountId) -> Result<(), DbError> {
        let db = get_db()?;
        let _: Option<AccountRequest> = db.delete(("account_request", account_id.as_str())).await?;
        Ok(())
    }
}
