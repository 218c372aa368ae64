//! Account request and sign-in server functions.

use dioxus::prelude::*;
use portal_core::{AccountRequest, NewAccountRequest, Session};
use serde::{Deserialize, Serialize};

/// Result of rejecting an account request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectOutcome {
    pub request: AccountRequest,
    /// Receipts deleted together with the account.
    pub receipts_removed: usize,
}

/// Submit a request for a new employee account.
#[post("/api/accounts/request")]
pub async fn request_account(form: NewAccountRequest) -> Result<AccountRequest, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use chrono::Utc;
        use db::repositories::{AccountRequestRepository, CredentialRepository};
        use portal_core::{PortalEvent, Role};

        use crate::session::{db_error, invalid, publish, ready};

        ready().await?;

        let request = form.validate(Utc::now()).map_err(invalid)?;
        let admin_taken = crate::portal_config()
            .is_some_and(|cfg| cfg.admin_id.eq_ignore_ascii_case(request.account_id.as_str()));
        if admin_taken {
            return Err(ServerFnError::new(format!(
                "Account ID '{}' is already taken",
                request.account_id
            )));
        }

        let created = AccountRequestRepository::create(&request)
            .await
            .map_err(db_error)?;
        CredentialRepository::set_password(&created.account_id, &form.password, Role::Employee)
            .await
            .map_err(db_error)?;

        publish(PortalEvent::AccountRequested {
            account_id: created.account_id.clone(),
            full_name: created.full_name.clone(),
            timestamp: created.requested_at,
        });

        Ok(created)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// List account requests, newest first.
#[get("/api/accounts/requests")]
pub async fn list_account_requests(
    token: String,
    status: Option<String>,
) -> Result<Vec<AccountRequest>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::AccountRequestRepository;
        use portal_core::RequestStatus;

        use crate::session::{db_error, invalid, require_admin};

        require_admin(&token).await?;

        let status = match status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => None,
            Some(raw) => Some(raw.parse::<RequestStatus>().map_err(invalid)?),
        };

        AccountRequestRepository::list(status)
            .await
            .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Get one account request.
#[get("/api/accounts/requests/:account_id")]
pub async fn get_account_request(
    account_id: String,
    token: String,
) -> Result<AccountRequest, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::AccountRequestRepository;
        use portal_core::AccountId;

        use crate::session::{db_error, invalid, require_admin};

        require_admin(&token).await?;
        let account_id = AccountId::parse(&account_id).map_err(invalid)?;

        AccountRequestRepository::get(&account_id)
            .await
            .map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Approve a pending account request.
#[post("/api/accounts/requests/:account_id/approve")]
pub async fn approve_account_request(
    account_id: String,
    token: String,
) -> Result<AccountRequest, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use chrono::Utc;
        use db::repositories::AccountRequestRepository;
        use portal_core::{AccountId, PortalEvent};

        use crate::session::{db_error, invalid, publish, require_admin};

        require_admin(&token).await?;
        let account_id = AccountId::parse(&account_id).map_err(invalid)?;

        let mut request = AccountRequestRepository::get(&account_id)
            .await
            .map_err(db_error)?;
        let now = Utc::now();
        request.approve(now).map_err(invalid)?;

        let updated = AccountRequestRepository::update(&request)
            .await
            .map_err(db_error)?;

        publish(PortalEvent::AccountApproved {
            account_id,
            timestamp: now,
        });

        Ok(updated)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Reject a pending account request.
///
/// The account's receipts, stored images, credential and sessions are removed.
#[post("/api/accounts/requests/:account_id/reject")]
pub async fn reject_account_request(
    account_id: String,
    token: String,
    note: Option<String>,
) -> Result<RejectOutcome, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use chrono::Utc;
        use db::repositories::{
            AccountRequestRepository, CredentialRepository, ReceiptRepository, SessionRepository,
        };
        use portal_core::{AccountId, PortalEvent};

        use crate::session::{db_error, invalid, publish, require_admin};

        require_admin(&token).await?;
        let account_id = AccountId::parse(&account_id).map_err(invalid)?;

        let mut request = AccountRequestRepository::get(&account_id)
            .await
            .map_err(db_error)?;
        let now = Utc::now();
        request.reject(note, now).map_err(invalid)?;

        let updated = AccountRequestRepository::update(&request)
            .await
            .map_err(db_error)?;

        let removed = ReceiptRepository::delete_for_account(&account_id)
            .await
            .map_err(db_error)?;
        crate::receipts::delete_images(&removed).await;
        CredentialRepository::delete(&account_id)
            .await
            .map_err(db_error)?;
        SessionRepository::delete_for_account(&account_id)
            .await
            .map_err(db_error)?;

        publish(PortalEvent::AccountRejected {
            account_id,
            receipts_removed: removed.len(),
            timestamp: now,
        });

        Ok(RejectOutcome {
            request: updated,
            receipts_removed: removed.len(),
        })
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Sign in with an account ID and password.
///
/// Employees can sign in once their request is approved.
#[post("/api/auth/sign-in")]
pub async fn sign_in(account_id: String, password: String) -> Result<Session, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::{
            AccountRequestRepository, CredentialRepository, ProfileRepository, SessionRepository,
        };
        use portal_core::{AccountId, RequestStatus, Role};

        use crate::session::{db_error, ready};

        const BAD_CREDENTIALS: &str = "Invalid account ID or password";

        ready().await?;

        let account_id =
            AccountId::parse(&account_id).map_err(|_| ServerFnError::new(BAD_CREDENTIALS))?;
        let role = CredentialRepository::verify(&account_id, &password)
            .await
            .map_err(db_error)?
            .ok_or_else(|| ServerFnError::new(BAD_CREDENTIALS))?;

        let display_name = match role {
            Role::Admin => "Administrator".to_string(),
            Role::Employee => {
                let request = AccountRequestRepository::get(&account_id)
                    .await
                    .map_err(|_| ServerFnError::new(BAD_CREDENTIALS))?;
                match request.status {
                    RequestStatus::Approved => {}
                    RequestStatus::Pending => {
                        return Err(ServerFnError::new(
                            "Your account request is still waiting for approval",
                        ));
                    }
                    RequestStatus::Rejected => {
                        return Err(ServerFnError::new("Your account request was rejected"));
                    }
                }
                ProfileRepository::find(&account_id)
                    .await
                    .map_err(db_error)?
                    .map(|p| p.name)
                    .unwrap_or(request.full_name)
            }
        };

        let session = SessionRepository::create(&account_id, role, display_name)
            .await
            .map_err(db_error)?;
        tracing::info!("{} signed in as {}", account_id, role.as_str());
        Ok(session)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// End a session.
#[post("/api/auth/sign-out")]
pub async fn sign_out(token: String) -> Result<(), ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::SessionRepository;

        use crate::session::{db_error, ready};

        ready().await?;
        SessionRepository::delete(&token).await.map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
