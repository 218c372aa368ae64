//! Expense receipt domain types.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::account::AccountId;
use crate::error::{ValidationError, required};

/// Currency used when none is given.
pub const DEFAULT_CURRENCY: &str = "PHP";

/// Unique identifier for a receipt, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(pub Ulid);

impl ReceiptId {
    /// Create a new unique receipt ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse a receipt ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expense category assigned by the classifier or by the employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Meals,
    Travel,
    Fuel,
    Accommodation,
    #[serde(rename = "Office Supplies")]
    OfficeSupplies,
    Utilities,
    #[default]
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        ExpenseCategory::Meals,
        ExpenseCategory::Travel,
        ExpenseCategory::Fuel,
        ExpenseCategory::Accommodation,
        ExpenseCategory::OfficeSupplies,
        ExpenseCategory::Utilities,
        ExpenseCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Meals => "Meals",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Fuel => "Fuel",
            ExpenseCategory::Accommodation => "Accommodation",
            ExpenseCategory::OfficeSupplies => "Office Supplies",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ValidationError::invalid("Expense type", format!("unknown category '{wanted}'"))
            })
    }
}

/// Where a receipt is in the review workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceiptStatus {
    /// Extracted by OCR or entered by hand, not yet sent for review.
    #[default]
    Parsed,
    /// Sent to an admin for review.
    Submitted,
    Approved,
    Rejected,
    /// Approved and closed by an admin.
    Finalized,
}

impl ReceiptStatus {
    pub const ALL: [ReceiptStatus; 5] = [
        ReceiptStatus::Parsed,
        ReceiptStatus::Submitted,
        ReceiptStatus::Approved,
        ReceiptStatus::Rejected,
        ReceiptStatus::Finalized,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptStatus::Parsed => "Parsed",
            ReceiptStatus::Submitted => "Submitted",
            ReceiptStatus::Approved => "Approved",
            ReceiptStatus::Rejected => "Rejected",
            ReceiptStatus::Finalized => "Finalized",
        }
    }

    /// Whether the workflow allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: ReceiptStatus) -> bool {
        use ReceiptStatus::*;
        matches!(
            (self, next),
            (Parsed, Submitted)
                | (Rejected, Submitted)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (Approved, Finalized)
        )
    }

    /// Whether the owner may still edit or delete the receipt.
    pub fn is_owner_editable(&self) -> bool {
        matches!(
            self,
            ReceiptStatus::Parsed | ReceiptStatus::Submitted | ReceiptStatus::Rejected
        )
    }

    /// Statuses an owner may pick in the edit form.
    pub fn owner_selectable(&self) -> bool {
        matches!(self, ReceiptStatus::Parsed | ReceiptStatus::Submitted)
    }

    pub fn tone(&self) -> StatusTone {
        match self {
            ReceiptStatus::Approved | ReceiptStatus::Finalized => StatusTone::Positive,
            ReceiptStatus::Rejected => StatusTone::Negative,
            ReceiptStatus::Parsed | ReceiptStatus::Submitted => StatusTone::Waiting,
        }
    }
}

impl std::fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReceiptStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ReceiptStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::invalid("Status", format!("unknown status '{wanted}'")))
    }
}

/// Colour family used for status dots and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Negative,
    Waiting,
}

impl StatusTone {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTone::Positive => "positive",
            StatusTone::Negative => "negative",
            StatusTone::Waiting => "waiting",
        }
    }
}

/// Reference to a stored receipt image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptImage {
    /// Object store key.
    pub key: String,
    pub file_name: String,
    pub content_type: String,
}

impl ReceiptImage {
    pub fn extension(&self) -> &'static str {
        extension_for_content_type(&self.content_type)
    }
}

/// File extension for an image content type. `image/jpeg` maps to `jpg`.
pub fn extension_for_content_type(content_type: &str) -> &'static str {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        "image/tiff" => "tiff",
        "application/pdf" => "pdf",
        _ => "png",
    }
}

/// Parse an amount typed by a person: everything except digits and `.` is dropped.
///
/// `"PHP 1,250.50"` parses to `1250.5`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(round_cents)
}

pub(crate) fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// An expense receipt owned by one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReceipt {
    pub id: ReceiptId,
    /// Owner's login.
    pub account_id: AccountId,
    /// Employee name shown in the ledger.
    pub owner_name: String,
    pub receipt_no: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub currency: String,
    pub category: ExpenseCategory,
    pub status: ReceiptStatus,
    /// Merchant line or short description.
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub image: Option<ReceiptImage>,
    #[serde(default)]
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenseReceipt {
    /// Create a new parsed receipt.
    pub fn new(
        account_id: AccountId,
        owner_name: impl Into<String>,
        receipt_no: impl Into<String>,
        date: NaiveDate,
        amount: f64,
        category: ExpenseCategory,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReceiptId::new(),
            account_id,
            owner_name: owner_name.into(),
            receipt_no: receipt_no.into(),
            date,
            amount: round_cents(amount.max(0.0)),
            currency: DEFAULT_CURRENCY.to_string(),
            category,
            status: ReceiptStatus::Parsed,
            source_text: String::new(),
            image: None,
            review_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: ReceiptId) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: ReceiptStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_source_text(mut self, text: impl Into<String>) -> Self {
        self.source_text = text.into();
        self
    }

    pub fn with_image(mut self, image: ReceiptImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Display form of the amount, e.g. `PHP 150.50`.
    pub fn amount_label(&self) -> String {
        format!("{} {:.2}", self.currency, self.amount)
    }

    /// Key used to detect the same receipt extracted twice.
    pub fn dedup_key(&self) -> String {
        format!("{}-{}-{}", self.receipt_no, self.amount_label(), self.date)
    }

    /// Upper-case month heading, e.g. `FEBRUARY 2026`.
    pub fn month_label(&self) -> String {
        month_label(self.date)
    }

    /// File name offered when downloading the receipt image.
    pub fn image_file_name(&self) -> Option<String> {
        self.image.as_ref().map(|image| {
            if image.file_name.trim().is_empty() {
                format!("{}.{}", self.receipt_no, image.extension())
            } else {
                image.file_name.clone()
            }
        })
    }

    /// File name offered when downloading metadata for a receipt without an image.
    pub fn metadata_file_name(&self) -> String {
        format!("{}.json", self.receipt_no)
    }

    /// Apply a workflow transition, recording the reviewer's note.
    pub fn transition(
        &mut self,
        next: ReceiptStatus,
        note: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<ReceiptStatus, ValidationError> {
        if !self.status.can_transition_to(next) {
            return Err(ValidationError::transition(self.status, next));
        }
        let previous = self.status;
        self.status = next;
        if let Some(note) = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()) {
            self.review_note = Some(note);
        }
        self.updated_at = at;
        Ok(previous)
    }

    /// Fails once review has moved the receipt out of the owner's hands.
    pub fn ensure_owner_editable(&self) -> Result<(), ValidationError> {
        if self.status.is_owner_editable() {
            Ok(())
        } else {
            Err(ValidationError::invalid(
                "Status",
                format!("{} receipts can no longer be changed", self.status),
            ))
        }
    }
}

pub(crate) fn month_label(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B").to_string().to_uppercase(), date.year())
}

/// Drop incoming receipts whose dedup key already exists, keeping input order.
///
/// Returns the fresh receipts and how many were skipped.
pub fn split_duplicates(
    existing: &[ExpenseReceipt],
    incoming: Vec<ExpenseReceipt>,
) -> (Vec<ExpenseReceipt>, usize) {
    let mut seen: HashSet<String> = existing.iter().map(ExpenseReceipt::dedup_key).collect();
    let mut duplicates = 0;
    let fresh = incoming
        .into_iter()
        .filter(|receipt| {
            if seen.insert(receipt.dedup_key()) {
                true
            } else {
                duplicates += 1;
                false
            }
        })
        .collect();
    (fresh, duplicates)
}

/// Raw values from the receipt edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptEdit {
    pub receipt_no: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub owner_name: String,
    pub category: String,
    pub amount: String,
    /// Empty means `Parsed`.
    pub status: String,
    pub source_text: String,
}

impl ReceiptEdit {
    /// Prefill the dialog from an existing receipt.
    pub fn from_receipt(receipt: &ExpenseReceipt) -> Self {
        Self {
            receipt_no: receipt.receipt_no.clone(),
            date: receipt.date.format("%Y-%m-%d").to_string(),
            owner_name: receipt.owner_name.clone(),
            category: receipt.category.label().to_string(),
            amount: format!("{:.2}", receipt.amount),
            status: receipt.status.as_str().to_string(),
            source_text: receipt.source_text.clone(),
        }
    }

    /// Validate the edit and write it into `receipt`.
    ///
    /// Nothing is written when validation fails.
    pub fn apply(&self, receipt: &mut ExpenseReceipt, at: DateTime<Utc>) -> Result<(), ValidationError> {
        receipt.ensure_owner_editable()?;

        let date = crate::error::optional_date("Date", &self.date)?
            .ok_or_else(|| ValidationError::required("Date"))?;
        let receipt_no = required("Receipt No.", &self.receipt_no)?;
        let owner_name = required("Employee name", &self.owner_name)?;
        let category: ExpenseCategory = required("Expense type", &self.category)?.parse()?;

        if self.amount.trim().is_empty() {
            return Err(ValidationError::required("Amount"));
        }
        let amount = parse_amount(&self.amount)
            .ok_or_else(|| ValidationError::invalid("Amount", "must be a number"))?;

        let status = if self.status.trim().is_empty() {
            ReceiptStatus::Parsed
        } else {
            self.status.parse::<ReceiptStatus>()?
        };
        if status != receipt.status && !status.owner_selectable() {
            return Err(ValidationError::transition(receipt.status, status));
        }

        receipt.date = date;
        receipt.receipt_no = receipt_no;
        receipt.owner_name = owner_name;
        receipt.category = category;
        receipt.amount = amount;
        receipt.status = status;
        receipt.source_text = self.source_text.trim().to_string();
        receipt.updated_at = at;
        Ok(())
    }
}

/// Receipt fields without image data, used for JSON exports and downloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptMetadata {
    pub id: ReceiptId,
    pub receipt_no: String,
    pub date: NaiveDate,
    pub amount: f64,
    pub amount_label: String,
    pub category: ExpenseCategory,
    pub status: ReceiptStatus,
    pub owner_name: String,
    pub account_id: AccountId,
    pub source_text: String,
}

impl From<&ExpenseReceipt> for ReceiptMetadata {
    fn from(receipt: &ExpenseReceipt) -> Self {
        Self {
            id: receipt.id,
            receipt_no: receipt.receipt_no.clone(),
            date: receipt.date,
            amount: receipt.amount,
            amount_label: receipt.amount_label(),
            category: receipt.category,
            status: receipt.status,
            owner_name: receipt.owner_name.clone(),
            account_id: receipt.account_id.clone(),
            source_text: receipt.source_text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    fn receipt(no: &str, amount: f64, day: u32) -> ExpenseReceipt {
        ExpenseReceipt::new(
            AccountId::parse("emp-demo-001").unwrap(),
            "Juan Dela Cruz",
            no,
            NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            amount,
            ExpenseCategory::Meals,
        )
    }

    #[test]
    fn amount_label_and_dedup_key() {
        let r = receipt("RCP-1001", 150.5, 20);
        assert_eq!(r.amount_label(), "PHP 150.50");
        assert_eq!(r.dedup_key(), "RCP-1001-PHP 150.50-2026-02-20");
        assert_eq!(r.month_label(), "FEBRUARY 2026");
    }

    #[test]
    fn parse_amount_strips_noise() {
        assert_eq!(parse_amount("PHP 1,250.50"), Some(1250.5));
        assert_eq!(parse_amount("980"), Some(980.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn content_type_extensions() {
        assert_eq!(extension_for_content_type("image/jpeg"), "jpg");
        assert_eq!(extension_for_content_type("IMAGE/PNG"), "png");
        assert_eq!(extension_for_content_type("application/octet-stream"), "png");
    }

    #[test]
    fn category_and_status_parse_from_labels() {
        assert_eq!(
            "office supplies".parse::<ExpenseCategory>(),
            Ok(ExpenseCategory::OfficeSupplies)
        );
        assert_eq!("approved".parse::<ReceiptStatus>(), Ok(ReceiptStatus::Approved));
        assert!("Paid".parse::<ReceiptStatus>().is_err());
    }

    #[test]
    fn category_serializes_with_display_label() {
        let json = serde_json::to_string(&ExpenseCategory::OfficeSupplies).unwrap();
        assert_eq!(json, "\"Office Supplies\"");
    }

    #[test]
    fn workflow_transitions() {
        let mut r = receipt("RCP-1", 10.0, 1);
        assert!(r.transition(ReceiptStatus::Approved, None, Utc::now()).is_err());
        r.transition(ReceiptStatus::Submitted, None, Utc::now()).unwrap();
        r.transition(ReceiptStatus::Rejected, Some(" blurry ".into()), Utc::now())
            .unwrap();
        assert_eq!(r.review_note.as_deref(), Some("blurry"));
        r.transition(ReceiptStatus::Submitted, None, Utc::now()).unwrap();
        r.transition(ReceiptStatus::Approved, None, Utc::now()).unwrap();
        let previous = r
            .transition(ReceiptStatus::Finalized, None, Utc::now())
            .unwrap();
        assert_eq!(previous, ReceiptStatus::Approved);
        assert_eq!(r.status.tone(), StatusTone::Positive);
    }

    #[test]
    fn split_duplicates_skips_known_and_repeated_keys() {
        let existing = vec![receipt("RCP-1", 10.0, 1)];
        let incoming = vec![
            receipt("RCP-1", 10.0, 1),
            receipt("RCP-2", 20.0, 2),
            receipt("RCP-2", 20.0, 2),
        ];
        let (fresh, duplicates) = split_duplicates(&existing, incoming);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].receipt_no, "RCP-2");
        assert_eq!(duplicates, 2);
    }

    #[test]
    fn edit_applies_valid_values() {
        let mut r = receipt("RCP-1", 10.0, 1);
        let mut edit = ReceiptEdit::from_receipt(&r);
        edit.amount = "PHP 2,200".into();
        edit.category = "Utilities".into();
        edit.status = String::new();
        edit.apply(&mut r, Utc::now()).unwrap();
        assert_eq!(r.amount, 2200.0);
        assert_eq!(r.amount_label(), "PHP 2200.00");
        assert_eq!(r.category, ExpenseCategory::Utilities);
        assert_eq!(r.status, ReceiptStatus::Parsed);
    }

    #[test]
    fn edit_rejects_missing_fields_without_writing() {
        let mut r = receipt("RCP-1", 10.0, 1);
        let mut edit = ReceiptEdit::from_receipt(&r);
        edit.receipt_no = " ".into();
        edit.amount = "99".into();
        assert_eq!(
            edit.apply(&mut r, Utc::now()),
            Err(ValidationError::Required("Receipt No.".into()))
        );
        assert_eq!(r.amount, 10.0);

        let mut edit = ReceiptEdit::from_receipt(&r);
        edit.amount = "n/a".into();
        assert!(edit.apply(&mut r, Utc::now()).is_err());
    }

    #[test]
    fn edit_cannot_self_approve_or_touch_finalized() {
        let mut r = receipt("RCP-1", 10.0, 1);
        let mut edit = ReceiptEdit::from_receipt(&r);
        edit.status = "Approved".into();
        assert!(matches!(
            edit.apply(&mut r, Utc::now()),
            Err(ValidationError::InvalidTransition { .. })
        ));

        let mut locked = receipt("RCP-2", 10.0, 1).with_status(ReceiptStatus::Finalized);
        let edit = ReceiptEdit::from_receipt(&locked);
        assert!(edit.apply(&mut locked, Utc::now()).is_err());
    }

    #[test]
    fn owner_loses_control_after_approval() {
        for status in [ReceiptStatus::Parsed, ReceiptStatus::Submitted, ReceiptStatus::Rejected] {
            let r = receipt("RCP-1", 10.0, 1).with_status(status);
            assert!(r.ensure_owner_editable().is_ok(), "{status}");
        }
        for status in [ReceiptStatus::Approved, ReceiptStatus::Finalized] {
            let r = receipt("RCP-1", 10.0, 1).with_status(status);
            assert!(matches!(
                r.ensure_owner_editable(),
                Err(ValidationError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn download_names() {
        let r = receipt("RCP-9", 1.0, 1).with_image(ReceiptImage {
            key: "k".into(),
            file_name: String::new(),
            content_type: "image/jpeg".into(),
        });
        assert_eq!(r.image_file_name().as_deref(), Some("RCP-9.jpg"));
        assert_eq!(r.metadata_file_name(), "RCP-9.json");
    }
}
