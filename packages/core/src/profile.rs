//! Employee profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::error::{ValidationError, optional_date, plausible_email, required};

/// Personal details an employee must fill in before uploading receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: AccountId,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Raw profile form values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub name: String,
    /// `YYYY-MM-DD` or empty.
    pub date_of_birth: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl ProfileDraft {
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            date_of_birth: profile
                .date_of_birth
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            department: profile.department.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            address: profile.address.clone(),
        }
    }

    /// Validate the draft into a profile owned by `user_id`.
    pub fn validate(&self, user_id: AccountId, now: DateTime<Utc>) -> Result<Profile, ValidationError> {
        let name = required("Name", &self.name)?;
        let email = required("Email", &self.email)?;
        if !plausible_email(&email) {
            return Err(ValidationError::invalid("Email", "is not a valid address"));
        }
        let date_of_birth = optional_date("Date of birth", &self.date_of_birth)?;
        if date_of_birth.is_some_and(|dob| dob > now.date_naive()) {
            return Err(ValidationError::invalid("Date of birth", "cannot be in the future"));
        }

        Ok(Profile {
            user_id,
            name,
            date_of_birth,
            department: self.department.trim().to_string(),
            email,
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    fn user() -> AccountId {
        AccountId::parse("emp-demo-002").unwrap()
    }

    #[test]
    fn draft_round_trips_through_profile() {
        let draft = ProfileDraft {
            name: " Maria Santos ".into(),
            date_of_birth: "1992-07-01".into(),
            department: "Finance".into(),
            email: "maria@example.com".into(),
            phone: String::new(),
            address: String::new(),
        };
        let profile = draft.validate(user(), Utc::now()).unwrap();
        assert_eq!(profile.name, "Maria Santos");
        assert!(profile.is_complete());

        let again = ProfileDraft::from_profile(&profile);
        assert_eq!(again.date_of_birth, "1992-07-01");
        assert_eq!(again.name, "Maria Santos");
    }

    #[test]
    fn draft_requires_name_and_valid_email() {
        let draft = ProfileDraft {
            email: "maria@example.com".into(),
            ..Default::default()
        };
        assert_eq!(
            draft.validate(user(), Utc::now()),
            Err(ValidationError::Required("Name".into()))
        );

        let draft = ProfileDraft {
            name: "Maria".into(),
            email: "maria".into(),
            ..Default::default()
        };
        assert!(draft.validate(user(), Utc::now()).is_err());
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let draft = ProfileDraft {
            name: "Maria".into(),
            email: "maria@example.com".into(),
            date_of_birth: "2999-01-01".into(),
            ..Default::default()
        };
        assert!(draft.validate(user(), Utc::now()).is_err());
    }
}
