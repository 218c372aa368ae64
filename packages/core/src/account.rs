//! Account request domain types.
//!
//! A prospective employee submits an [`AccountRequest`]; an admin then
//! approves or rejects it. Only approved accounts may sign in.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, optional_date, plausible_email, required};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Login name chosen by the employee, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Parse and normalize an account ID.
    ///
    /// Accepts 3 to 64 characters of `a-z`, `0-9`, `.`, `_` and `-`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let normalized = s.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::required("Account ID"));
        }
        if !(3..=64).contains(&normalized.len()) {
            return Err(ValidationError::invalid(
                "Account ID",
                "must be between 3 and 64 characters",
            ));
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ValidationError::invalid(
                "Account ID",
                "may only contain letters, digits, '.', '_' and '-'",
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of an account request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Approved and rejected requests are never reviewed again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    pub fn tone(&self) -> crate::StatusTone {
        match self {
            RequestStatus::Pending => crate::StatusTone::Waiting,
            RequestStatus::Approved => crate::StatusTone::Positive,
            RequestStatus::Rejected => crate::StatusTone::Negative,
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(ValidationError::invalid(
                "Status",
                format!("unknown request status '{other}'"),
            )),
        }
    }
}

/// Role attached to a sign-in credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Admin => "admin",
        }
    }
}

/// A signed-in user, identified by an opaque token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub account_id: AccountId,
    pub role: Role,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A request for a portal account awaiting admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRequest {
    pub account_id: AccountId,
    pub full_name: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: Option<NaiveDate>,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_note: Option<String>,
}

impl AccountRequest {
    /// Create a new pending request.
    pub fn new(account_id: AccountId, full_name: impl Into<String>) -> Self {
        Self {
            account_id,
            full_name: full_name.into(),
            department: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            date_of_birth: None,
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
            reviewed_at: None,
            review_note: None,
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    pub fn with_requested_at(mut self, requested_at: DateTime<Utc>) -> Self {
        self.requested_at = requested_at;
        self
    }

    /// Move a pending request to approved.
    pub fn approve(&mut self, at: DateTime<Utc>) -> Result<(), ValidationError> {
        self.review(RequestStatus::Approved, None, at)
    }

    /// Move a pending request to rejected, keeping the reviewer's note.
    pub fn reject(&mut self, note: Option<String>, at: DateTime<Utc>) -> Result<(), ValidationError> {
        self.review(RequestStatus::Rejected, note, at)
    }

    fn review(
        &mut self,
        next: RequestStatus,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        if self.status.is_terminal() {
            return Err(ValidationError::transition(self.status, next));
        }
        self.status = next;
        self.reviewed_at = Some(at);
        self.review_note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        Ok(())
    }
}

/// Raw "Request Account" form values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewAccountRequest {
    pub account_id: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// `YYYY-MM-DD` or empty.
    pub date_of_birth: String,
}

impl NewAccountRequest {
    /// Validate the form and build the pending request it describes.
    ///
    /// The password is checked here but never copied into the request.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<AccountRequest, ValidationError> {
        let full_name = required("Full name", &self.full_name)?;
        let account_id = AccountId::parse(&self.account_id)?;

        let email = required("Email", &self.email)?;
        if !plausible_email(&email) {
            return Err(ValidationError::invalid("Email", "is not a valid address"));
        }

        if self.password.is_empty() {
            return Err(ValidationError::required("Password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::invalid(
                "Password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        let mut request = AccountRequest::new(account_id, full_name)
            .with_department(self.department.trim())
            .with_email(email)
            .with_phone(self.phone.trim())
            .with_address(self.address.trim())
            .with_requested_at(now);
        if let Some(dob) = optional_date("Date of birth", &self.date_of_birth)? {
            request = request.with_date_of_birth(dob);
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    fn form() -> NewAccountRequest {
        NewAccountRequest {
            account_id: " Emp-Demo-001 ".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            full_name: "Juan Dela Cruz".into(),
            department: "Operations".into(),
            email: "juan@example.com".into(),
            phone: "+63 900 000 0001".into(),
            address: "Cebu City".into(),
            date_of_birth: "1990-01-15".into(),
        }
    }

    #[test]
    fn account_id_is_normalized() {
        let id = AccountId::parse("  Emp.Demo_01 ").unwrap();
        assert_eq!(id.as_str(), "emp.demo_01");
        assert!(AccountId::parse("ab").is_err());
        assert!(AccountId::parse("has space").is_err());
        assert!(matches!(
            AccountId::parse("   "),
            Err(ValidationError::Required(_))
        ));
    }

    #[test]
    fn valid_form_builds_pending_request() {
        let now = Utc::now();
        let request = form().validate(now).unwrap();
        assert_eq!(request.account_id.as_str(), "emp-demo-001");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requested_at, now);
        assert_eq!(request.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 15));
    }

    #[test]
    fn form_accepts_undotted_email_domain() {
        let mut local = form();
        local.email = "juan@localhost".into();
        assert!(local.validate(Utc::now()).is_ok());

        let mut missing = form();
        missing.email = "juan@".into();
        assert!(matches!(
            missing.validate(Utc::now()),
            Err(ValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn form_rejects_bad_passwords() {
        let mut mismatch = form();
        mismatch.confirm_password = "other".into();
        assert_eq!(
            mismatch.validate(Utc::now()),
            Err(ValidationError::PasswordMismatch)
        );

        let mut short = form();
        short.password = "abc".into();
        short.confirm_password = "abc".into();
        assert!(matches!(
            short.validate(Utc::now()),
            Err(ValidationError::Invalid { .. })
        ));
    }

    #[test]
    fn form_requires_name_and_email() {
        let mut missing_name = form();
        missing_name.full_name = "  ".into();
        assert_eq!(
            missing_name.validate(Utc::now()),
            Err(ValidationError::Required("Full name".into()))
        );

        let mut bad_email = form();
        bad_email.email = "juan.example.com".into();
        assert!(bad_email.validate(Utc::now()).is_err());
    }

    #[test]
    fn only_pending_requests_can_be_reviewed() {
        let mut request = form().validate(Utc::now()).unwrap();
        request.approve(Utc::now()).unwrap();
        assert_eq!(request.status, RequestStatus::Approved);
        assert!(request.reviewed_at.is_some());

        let err = request.reject(Some("late".into()), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidTransition {
                from: "approved".into(),
                to: "rejected".into()
            }
        );
    }

    #[test]
    fn reject_keeps_trimmed_note() {
        let mut request = form().validate(Utc::now()).unwrap();
        request
            .reject(Some("  duplicate account ".into()), Utc::now())
            .unwrap();
        assert_eq!(request.status, RequestStatus::Rejected);
        assert_eq!(request.review_note.as_deref(), Some("duplicate account"));
    }

    #[test]
    fn request_status_parses_case_insensitively() {
        assert_eq!("Pending".parse::<RequestStatus>(), Ok(RequestStatus::Pending));
        assert!("unknown".parse::<RequestStatus>().is_err());
    }
}
