//! Employee profile repository.

use portal_core::{AccountId, Profile};

use crate::{DbError, get_db};

/// Repository for employee profiles, keyed by account ID.
pub struct ProfileRepository;

impl ProfileRepository {
    /// Find the profile for an account, if one has been saved.
    pub async fn find(user_id: &AccountId) -> Result<Option<Profile>, DbError> {
        let db = get_db()?;
        let record: Option<Profile> = db.select(("profile", user_id.as_str())).await?;
        Ok(record)
    }

    /// Create or replace a profile.
    pub async fn save(profile: &Profile) -> Result<Profile, DbError> {
        let db = get_db()?;

        let record: Option<Profile> = db
            .upsert(("profile", profile.user_id.as_str()))
            .content(profile.clone())
            .await?;

        record.ok_or_else(|| DbError::Query("Failed to save profile".into()))
    }

    /// Delete the profile for an account.
    pub async fn delete(user_id: &AccountId) -> Result<(), DbError> {
        let db = get_db()?;
        let _: Option<Profile> = db.delete(("profile", user_id.as_str())).await?;
        Ok(())
    }
}
