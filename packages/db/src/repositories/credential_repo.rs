//! Sign-in credentials and sessions.

use chrono::Utc;
use portal_core::{AccountId, Role, Session};
use serde::{Deserialize, Serialize};

use crate::secrets::{generate_salt, generate_token, hash_password, verify_password};
use crate::{DbError, get_db};

/// Repository for password credentials.
pub struct CredentialRepository;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialRecord {
    salt: String,
    digest: String,
    role: Role,
}

impl CredentialRepository {
    /// Create or replace the credential for an account.
    pub async fn set_password(
        account_id: &AccountId,
        password: &str,
        role: Role,
    ) -> Result<(), DbError> {
        let db = get_db()?;
        let salt = generate_salt();
        let record = CredentialRecord {
            digest: hash_password(&salt, password),
            salt,
            role,
        };

        let _: Option<CredentialRecord> = db
            .upsert(("credential", account_id.as_str()))
            .content(record)
            .await?;
        Ok(())
    }

    /// Check a password, returning the account's role on success.
    pub async fn verify(account_id: &AccountId, password: &str) -> Result<Option<Role>, DbError> {
        let db = get_db()?;
        let record: Option<CredentialRecord> =
            db.select(("credential", account_id.as_str())).await?;

        Ok(record
            .filter(|r| verify_password(&r.salt, password, &r.digest))
            .map(|r| r.role))
    }

    /// Remove the credential for an account.
    pub async fn delete(account_id: &AccountId) -> Result<(), DbError> {
        let db = get_db()?;
        let _: Option<CredentialRecord> = db.delete(("credential", account_id.as_str())).await?;
        Ok(())
    }
}

/// Repository for sign-in sessions.
pub struct SessionRepository;

impl SessionRepository {
    /// Open a session with a fresh random token.
    pub async fn create(
        account_id: &AccountId,
        role: Role,
        display_name: impl Into<String>,
    ) -> Result<Session, DbError> {
        let db = get_db()?;
        let session = Session {
            token: generate_token(),
            account_id: account_id.clone(),
            role,
            display_name: display_name.into(),
            created_at: Utc::now(),
        };

        let record: Option<Session> = db
            .create(("session", session.token.as_str()))
            .content(session.clone())
            .await?;

        record.ok_or_else(|| DbError::Query("Failed to create session".into()))
    }

    /// Look up a session by token.
    pub async fn get(token: &str) -> Result<Option<Session>, DbError> {
        if token.trim().is_empty() {
            return Ok(None);
        }
        let db = get_db()?;
        let record: Option<Session> = db.select(("session", token)).await?;
        Ok(record)
    }

    /// End a session.
    pub async fn delete(token: &str) -> Result<(), DbError> {
        let db = get_db()?;
        let _: Option<Session> = db.delete(("session", token)).await?;
        Ok(())
    }

    /// End every session of an account.
    pub async fn delete_for_account(account_id: &AccountId) -> Result<usize, DbError> {
        let db = get_db()?;
        let mut result = db
            .query("DELETE session WHERE account_id = $account_id RETURN BEFORE")
            .bind(("account_id", account_id.to_string()))
            .await?;
        let removed: Vec<Session> = result.take(0)?;
        Ok(removed.len())
    }
}
