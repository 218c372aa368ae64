//! Receipt repository for CRUD operations.

use chrono::{DateTime, NaiveDate, Utc};
use portal_core::{
    AccountId, ExpenseCategory, ExpenseReceipt, ReceiptId, ReceiptImage, ReceiptStatus,
};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use crate::{DbError, get_db};

/// Repository for receipt persistence operations.
pub struct ReceiptRepository;

/// Row stored in the `receipt` table. The receipt ID lives in the record ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReceiptRecord {
    #[serde(default, skip_serializing)]
    id: Option<Thing>,
    account_id: AccountId,
    owner_name: String,
    receipt_no: String,
    date: NaiveDate,
    amount: f64,
    currency: String,
    category: ExpenseCategory,
    status: ReceiptStatus,
    source_text: String,
    image: Option<ReceiptImage>,
    review_note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReceiptRecord {
    fn from_receipt(receipt: &ExpenseReceipt) -> Self {
        Self {
            id: None,
            account_id: receipt.account_id.clone(),
            owner_name: receipt.owner_name.clone(),
            receipt_no: receipt.receipt_no.clone(),
            date: receipt.date,
            amount: receipt.amount,
            currency: receipt.currency.clone(),
            category: receipt.category,
            status: receipt.status,
            source_text: receipt.source_text.clone(),
            image: receipt.image.clone(),
            review_note: receipt.review_note.clone(),
            created_at: receipt.created_at,
            updated_at: receipt.updated_at,
        }
    }

    fn into_receipt(self) -> Result<ExpenseReceipt, DbError> {
        let raw = self
            .id
            .as_ref()
            .map(|t| t.id.to_raw())
            .ok_or_else(|| DbError::Serialization("receipt record without id".into()))?;
        let id = ReceiptId::parse(&raw)
            .map_err(|e| DbError::Serialization(format!("bad receipt id '{raw}': {e}")))?;

        Ok(ExpenseReceipt {
            id,
            account_id: self.account_id,
            owner_name: self.owner_name,
            receipt_no: self.receipt_no,
            date: self.date,
            amount: self.amount,
            currency: self.currency,
            category: self.category,
            status: self.status,
            source_text: self.source_text,
            image: self.image,
            review_note: self.review_note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_receipts(records: Vec<ReceiptRecord>) -> Result<Vec<ExpenseReceipt>, DbError> {
    let mut receipts = records
        .into_iter()
        .map(ReceiptRecord::into_receipt)
        .collect::<Result<Vec<_>, _>>()?;
    receipts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    Ok(receipts)
}

impl ReceiptRepository {
    /// Create a new receipt.
    pub async fn create(receipt: &ExpenseReceipt) -> Result<ExpenseReceipt, DbError> {
        let db = get_db()?;

        let record: Option<ReceiptRecord> = db
            .create(("receipt", receipt.id.to_string()))
            .content(ReceiptRecord::from_receipt(receipt))
            .await?;

        record
            .ok_or_else(|| DbError::Query("Failed to create receipt".into()))?
            .into_receipt()
    }

    /// Get a receipt by ID.
    pub async fn get(id: ReceiptId) -> Result<ExpenseReceipt, DbError> {
        let db = get_db()?;

        let record: Option<ReceiptRecord> = db.select(("receipt", id.to_string())).await?;

        record
            .ok_or_else(|| DbError::NotFound(format!("Receipt not found: {}", id)))?
            .into_receipt()
    }

    /// List every receipt, newest first.
    pub async fn list_all() -> Result<Vec<ExpenseReceipt>, DbError> {
        let db = get_db()?;
        let records: Vec<ReceiptRecord> = db.select("receipt").await?;
        into_receipts(records)
    }

    /// List the receipts owned by one account, newest first.
    pub async fn list_for_account(account_id: &AccountId) -> Result<Vec<ExpenseReceipt>, DbError> {
        let db = get_db()?;

        let mut result = db
            .query("SELECT * FROM receipt WHERE account_id = $account_id")
            .bind(("account_id", account_id.to_string()))
            .await?;

        let records: Vec<ReceiptRecord> = result.take(0)?;
        into_receipts(records)
    }

    /// List receipts in any of the given statuses, newest first.
    pub async fn list_by_status(statuses: &[ReceiptStatus]) -> Result<Vec<ExpenseReceipt>, DbError> {
        let db = get_db()?;
        let wanted: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

        let mut result = db
            .query("SELECT * FROM receipt WHERE status IN $statuses")
            .bind(("statuses", wanted))
            .await?;

        let records: Vec<ReceiptRecord> = result.take(0)?;
        into_receipts(records)
    }

    /// Replace a receipt's stored fields.
    pub async fn update(receipt: &ExpenseReceipt) -> Result<ExpenseReceipt, DbError> {
        let db = get_db()?;

        let record: Option<ReceiptRecord> = db
            .update(("receipt", receipt.id.to_string()))
            .content(ReceiptRecord::from_receipt(receipt))
            .await?;

        record
            .ok_or_else(|| DbError::NotFound(format!("Receipt not found: {}", receipt.id)))?
            .into_receipt()
    }

    /// Delete a receipt, returning what was removed.
    pub async fn delete(id: ReceiptId) -> Result<ExpenseReceipt, DbError> {
        let db = get_db()?;

        let record: Option<ReceiptRecord> = db.delete(("receipt", id.to_string())).await?;

        record
            .ok_or_else(|| DbError::NotFound(format!("Receipt not found: {}", id)))?
            .into_receipt()
    }

    /// Delete every receipt owned by an account, returning what was removed.
    pub async fn delete_for_account(account_id: &AccountId) -> Result<Vec<ExpenseReceipt>, DbError> {
        let db = get_db()?;

        let mut result = db
            .query("DELETE receipt WHERE account_id = $account_id RETURN BEFORE")
            .bind(("account_id", account_id.to_string()))
            .await?;

        let records: Vec<ReceiptRecord> = result.take(0)?;
        into_receipts(records)
    }

    /// Check if any receipt exists.
    pub async fn is_empty() -> Result<bool, DbError> {
        let db = get_db()?;
        let mut result = db.query("SELECT id FROM receipt LIMIT 1").await?;
        let rows: Vec<serde_json::Value> = result.take(0)?;
        Ok(rows.is_empty())
    }
}
