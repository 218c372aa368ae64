//! OCR service wire types and field extraction from recognized text.
//!
//! The OCR service returns plain text per image, sometimes with structured
//! fields. Structured fields win; otherwise the text is scanned with a few
//! forgiving patterns.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::account::AccountId;
use crate::classify::classify;
use crate::receipt::{ExpenseReceipt, ReceiptId, parse_amount, round_cents};
use crate::upload::UploadImage;

/// Longest `source_text` kept from the first line of a page.
const SOURCE_TEXT_MAX_CHARS: usize = 120;

static RECEIPT_NO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:official\s+receipt|receipt|invoice|or|si)\s*(?:no\b\.?|number\b|#)\s*[:#.]?\s*([a-z0-9][a-z0-9-]{2,})",
    )
    .expect("receipt number pattern")
});

static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("iso date pattern")
});

static SLASH_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("slash date pattern")
});

static LONG_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2}),?\s+(\d{4})\b",
    )
    .expect("long date pattern")
});

/// Total keywords, strongest first.
static TOTAL_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"grand\s+total",
        r"total\s+amount|total\s+due|total",
        r"amount\s+due",
        r"amount",
    ]
    .iter()
    .map(|kw| {
        Regex::new(&format!(
            r"(?i)\b(?:{kw})\b[^0-9\n]{{0,12}}([0-9][0-9,]*(?:\.[0-9]{{1,2}})?)"
        ))
        .expect("total pattern")
    })
    .collect()
});

static MONEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9][0-9,]*\.[0-9]{2})\b").expect("money pattern"));

/// Request body sent to the OCR service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrRequest {
    pub account_id: String,
    pub images: Vec<UploadImage>,
}

/// Response body returned by the OCR service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResponse {
    #[serde(default)]
    pub results: Vec<OcrPage>,
}

/// Recognition result for one uploaded image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrPage {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub fields: OcrFields,
}

/// Structured fields some OCR engines return alongside the text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrFields {
    #[serde(default)]
    pub receipt_no: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub merchant: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid OCR response format: {0}")]
pub struct InvalidOcrResponse(pub String);

impl OcrResponse {
    pub fn from_json(body: &str) -> Result<Self, InvalidOcrResponse> {
        serde_json::from_str(body).map_err(|e| InvalidOcrResponse(e.to_string()))
    }
}

/// Who the extracted receipts belong to, and the fallback date.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext<'a> {
    pub account_id: &'a AccountId,
    pub owner_name: &'a str,
    pub today: NaiveDate,
}

/// Build a parsed receipt from one OCR page.
///
/// Returns `None` when no amount can be found.
pub fn receipt_from_page(page: &OcrPage, ctx: &ExtractionContext<'_>) -> Option<ExpenseReceipt> {
    let amount = non_blank(&page.fields.total)
        .and_then(parse_amount)
        .or_else(|| find_total(&page.text))?;

    let id = ReceiptId::new();
    let receipt_no = non_blank(&page.fields.receipt_no)
        .map(str::to_uppercase)
        .or_else(|| find_receipt_no(&page.text))
        .unwrap_or_else(|| fallback_receipt_no(id));
    let date = non_blank(&page.fields.date)
        .and_then(find_date)
        .or_else(|| find_date(&page.text))
        .unwrap_or(ctx.today);

    let merchant = non_blank(&page.fields.merchant);
    let category = classify(&format!("{} {}", merchant.unwrap_or_default(), page.text));
    let source_text = merchant
        .map(str::to_string)
        .unwrap_or_else(|| first_line(&page.text));

    Some(
        ExpenseReceipt::new(
            ctx.account_id.clone(),
            ctx.owner_name,
            receipt_no,
            date,
            amount,
            category,
        )
        .with_id(id)
        .with_source_text(source_text),
    )
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn fallback_receipt_no(id: ReceiptId) -> String {
    let id = id.to_string();
    format!("RCP-{}", &id[id.len().saturating_sub(6)..])
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|l| l.chars().take(SOURCE_TEXT_MAX_CHARS).collect())
        .unwrap_or_default()
}

/// First receipt/invoice number label in the text, upper-cased.
pub fn find_receipt_no(text: &str) -> Option<String> {
    RECEIPT_NO_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_uppercase())
}

/// Earliest valid date in the text, in ISO, `MM/DD/YYYY` or `Mon DD, YYYY` form.
pub fn find_date(text: &str) -> Option<NaiveDate> {
    let iso = ISO_DATE_RE.captures_iter(text).find_map(|c| {
        let date = NaiveDate::from_ymd_opt(
            c[1].parse().ok()?,
            c[2].parse().ok()?,
            c[3].parse().ok()?,
        )?;
        Some((c.get(0)?.start(), date))
    });
    let slash = SLASH_DATE_RE.captures_iter(text).find_map(|c| {
        let date = NaiveDate::from_ymd_opt(
            c[3].parse().ok()?,
            c[1].parse().ok()?,
            c[2].parse().ok()?,
        )?;
        Some((c.get(0)?.start(), date))
    });
    let long = LONG_DATE_RE.captures_iter(text).find_map(|c| {
        let raw = format!("{} {} {}", &c[1], &c[2], &c[3]);
        let date = NaiveDate::parse_from_str(&raw, "%b %d %Y").ok()?;
        Some((c.get(0)?.start(), date))
    });

    [iso, slash, long]
        .into_iter()
        .flatten()
        .min_by_key(|(start, _)| *start)
        .map(|(_, date)| date)
}

/// Amount after the strongest total keyword, else the largest money value.
pub fn find_total(text: &str) -> Option<f64> {
    for re in TOTAL_RES.iter() {
        if let Some(amount) = re
            .captures_iter(text)
            .filter_map(|c| parse_money(&c[1]))
            .last()
        {
            return Some(amount);
        }
    }
    MONEY_RE
        .captures_iter(text)
        .filter_map(|c| parse_money(&c[1]))
        .max_by(|a, b| a.total_cmp(b))
}

fn parse_money(raw: &str) -> Option<f64> {
    raw.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(round_cents)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    const JOLLIBEE: &str = "JOLLIBEE FOODS CORP\nSM City Cebu\nOfficial Receipt No: 004512\nDate: 02/20/2026\nChickenjoy meal 1 120.00\nSubtotal 134.38\nVAT 16.12\nTotal 150.50\nCash 200.00\nChange 49.50\n";

    fn ctx(account: &AccountId) -> ExtractionContext<'_> {
        ExtractionContext {
            account_id: account,
            owner_name: "Juan Dela Cruz",
            today: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        }
    }

    #[test]
    fn extracts_fields_from_plain_text() {
        let account = AccountId::parse("emp-demo-001").unwrap();
        let page = OcrPage {
            file_name: "lunch.jpg".into(),
            text: JOLLIBEE.into(),
            ..Default::default()
        };
        let receipt = receipt_from_page(&page, &ctx(&account)).unwrap();
        assert_eq!(receipt.receipt_no, "004512");
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        assert_eq!(receipt.amount, 150.5);
        assert_eq!(receipt.category, crate::ExpenseCategory::Meals);
        assert_eq!(receipt.source_text, "JOLLIBEE FOODS CORP");
        assert_eq!(receipt.owner_name, "Juan Dela Cruz");
    }

    #[test]
    fn structured_fields_take_priority() {
        let account = AccountId::parse("emp-demo-002").unwrap();
        let page = OcrPage {
            file_name: "flight.png".into(),
            text: "Total 1.00".into(),
            fields: OcrFields {
                receipt_no: Some(" rcp-1002 ".into()),
                date: Some("2026-02-21".into()),
                total: Some("PHP 3,500.00".into()),
                merchant: Some("Cebu Pacific flight".into()),
            },
        };
        let receipt = receipt_from_page(&page, &ctx(&account)).unwrap();
        assert_eq!(receipt.receipt_no, "RCP-1002");
        assert_eq!(receipt.amount, 3500.0);
        assert_eq!(receipt.amount_label(), "PHP 3500.00");
        assert_eq!(receipt.category, crate::ExpenseCategory::Travel);
        assert_eq!(receipt.source_text, "Cebu Pacific flight");
    }

    #[test]
    fn missing_amount_is_unreadable_and_missing_fields_fall_back() {
        let account = AccountId::parse("emp-demo-003").unwrap();
        let blank = OcrPage {
            text: "smudged".into(),
            ..Default::default()
        };
        assert!(receipt_from_page(&blank, &ctx(&account)).is_none());

        let bare = OcrPage {
            text: "Printer ink\n980.00".into(),
            ..Default::default()
        };
        let receipt = receipt_from_page(&bare, &ctx(&account)).unwrap();
        assert!(receipt.receipt_no.starts_with("RCP-"));
        assert_eq!(receipt.receipt_no.len(), 10);
        assert_eq!(receipt.date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(receipt.amount, 980.0);
        assert_eq!(receipt.category, crate::ExpenseCategory::OfficeSupplies);
    }

    #[test]
    fn date_formats_and_earliest_wins() {
        assert_eq!(
            find_date("Printed 2026-02-23 10:00"),
            NaiveDate::from_ymd_opt(2026, 2, 23)
        );
        assert_eq!(
            find_date("Check-in Feb 24, 2026 / checkout 02/26/2026"),
            NaiveDate::from_ymd_opt(2026, 2, 24)
        );
        assert_eq!(
            find_date("issued 13/45/2026 then 2026-02-01"),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(find_date("no date here"), None);
    }

    #[test]
    fn total_prefers_keywords_over_largest_value() {
        assert_eq!(find_total("Subtotal 100.00\nTotal 112.00\nCash 500.00"), Some(112.0));
        assert_eq!(find_total("GRAND TOTAL: 2,200.00\nTotal items 3"), Some(2200.0));
        assert_eq!(find_total("Amount due PHP 1,800"), Some(1800.0));
        assert_eq!(find_total("12.50\n1,250.75\n3.00"), Some(1250.75));
        assert_eq!(find_total("nothing"), None);
    }

    #[test]
    fn receipt_numbers() {
        assert_eq!(find_receipt_no("Invoice #inv-77 paid"), Some("INV-77".into()));
        assert_eq!(find_receipt_no("OR# 004512"), Some("004512".into()));
        assert_eq!(find_receipt_no("receipt number: RCP-1003"), Some("RCP-1003".into()));
        assert_eq!(find_receipt_no("for the store"), None);
        assert_eq!(find_receipt_no("OR No.004512"), Some("004512".into()));
    }

    #[test]
    fn receipt_no_label_needs_a_whole_word() {
        let text = "JOLLIBEE\nItems are non-returnable or non-refundable\nTotal 150.50";
        assert_eq!(find_receipt_no(text), None);
        assert_eq!(find_receipt_no("Receipt numbers vary"), None);
    }

    #[test]
    fn malformed_response_is_reported() {
        let err = OcrResponse::from_json("{\"results\": 5}").unwrap_err();
        assert!(err.to_string().starts_with("Invalid OCR response format"));
        let ok = OcrResponse::from_json("{\"results\": [{\"text\": \"x\", \"extra\": 1}]}").unwrap();
        assert_eq!(ok.results.len(), 1);
    }
}
