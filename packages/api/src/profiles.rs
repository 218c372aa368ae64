//! Employee profile server functions.

use dioxus::prelude::*;
use portal_core::{Profile, ProfileDraft};

/// Get a profile. Employees may read only their own.
#[get("/api/profiles/:user_id")]
pub async fn get_profile(user_id: String, token: String) -> Result<Option<Profile>, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use db::repositories::ProfileRepository;
        use portal_core::AccountId;

        use crate::session::{db_error, invalid, require_owner, require_session};

        let session = require_session(&token).await?;
        let user_id = AccountId::parse(&user_id).map_err(invalid)?;
        require_owner(&session, &user_id, true)?;

        ProfileRepository::find(&user_id).await.map_err(db_error)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}

/// Create or replace the caller's profile.
#[post("/api/profiles/save")]
pub async fn save_profile(token: String, draft: ProfileDraft) -> Result<Profile, ServerFnError> {
    #[cfg(feature = "server")]
    {
        use chrono::Utc;
        use db::repositories::ProfileRepository;
        use portal_core::PortalEvent;

        use crate::session::{db_error, invalid, publish, require_session};

        let session = require_session(&token).await?;
        let now = Utc::now();
        let profile = draft
            .validate(session.account_id.clone(), now)
            .map_err(invalid)?;

        let saved = ProfileRepository::save(&profile).await.map_err(db_error)?;

        publish(PortalEvent::ProfileSaved {
            account_id: saved.user_id.clone(),
            timestamp: now,
        });
        Ok(saved)
    }

    #[cfg(not(feature = "server"))]
    {
        Err(ServerFnError::new("Server-only function"))
    }
}
