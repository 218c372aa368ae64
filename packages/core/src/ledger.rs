//! Ledger view derivation: filtering, folder split, sorting, month grouping,
//! selection and export.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classify::Folder;
use crate::receipt::{ExpenseCategory, ExpenseReceipt, ReceiptId, ReceiptMetadata, ReceiptStatus};

/// Sortable ledger column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    ReceiptNo,
    Employee,
    Category,
    Amount,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Date,
        SortKey::ReceiptNo,
        SortKey::Employee,
        SortKey::Category,
        SortKey::Amount,
        SortKey::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::ReceiptNo => "Receipt No.",
            SortKey::Employee => "Employee",
            SortKey::Category => "Expense Type",
            SortKey::Amount => "Amount",
            SortKey::Status => "Status",
        }
    }

    /// Direction applied when the column is first clicked.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::Date | SortKey::Amount => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Active sort column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the same column flips direction, a new column starts
    /// at its default direction.
    pub fn click(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                key,
                direction: key.default_direction(),
            }
        }
    }

    fn compare(&self, a: &ExpenseReceipt, b: &ExpenseReceipt) -> Ordering {
        let primary = match self.key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::ReceiptNo => cmp_folded(&a.receipt_no, &b.receipt_no),
            SortKey::Employee => cmp_folded(&a.owner_name, &b.owner_name),
            SortKey::Category => cmp_folded(a.category.label(), b.category.label()),
            SortKey::Amount => a.amount.total_cmp(&b.amount),
            SortKey::Status => cmp_folded(a.status.as_str(), b.status.as_str()),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary
            .then_with(|| b.date.cmp(&a.date))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Ledger filter bar state. Every set condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerFilter {
    pub search: String,
    pub category: Option<ExpenseCategory>,
    pub status: Option<ReceiptStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
}

impl LedgerFilter {
    pub fn matches(&self, receipt: &ExpenseReceipt) -> bool {
        self.matches_search(receipt)
            && self.category.is_none_or(|c| receipt.category == c)
            && self.status.is_none_or(|s| receipt.status == s)
            && self.date_from.is_none_or(|from| receipt.date >= from)
            && self.date_to.is_none_or(|to| receipt.date <= to)
            && self.min_amount.is_none_or(|min| receipt.amount >= min)
            && self.max_amount.is_none_or(|max| receipt.amount <= max)
    }

    fn matches_search(&self, receipt: &ExpenseReceipt) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            receipt.receipt_no.to_lowercase(),
            receipt.category.label().to_lowercase(),
            receipt.owner_name.to_lowercase(),
            receipt.amount_label().to_lowercase(),
            receipt.date.format("%Y-%m-%d").to_string(),
        ]
        .iter()
        .any(|field| field.contains(&needle))
    }

    /// Whether any date or amount bound is set.
    pub fn has_advanced(&self) -> bool {
        self.date_from.is_some()
            || self.date_to.is_some()
            || self.min_amount.is_some()
            || self.max_amount.is_some()
    }

    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.status.is_some()
            || self.has_advanced()
    }
}

/// Everything needed to derive a ledger view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerQuery {
    pub filter: LedgerFilter,
    pub folder: Folder,
    pub sort: SortState,
}

/// Per-folder row counts after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderCounts {
    pub all: usize,
    pub travel_meals: usize,
    pub office_other: usize,
}

impl FolderCounts {
    pub fn get(&self, folder: Folder) -> usize {
        match folder {
            Folder::All => self.all,
            Folder::TravelMeals => self.travel_meals,
            Folder::OfficeOther => self.office_other,
        }
    }

    fn count(&mut self, category: ExpenseCategory) {
        self.all += 1;
        if Folder::TravelMeals.contains(category) {
            self.travel_meals += 1;
        }
        if Folder::OfficeOther.contains(category) {
            self.office_other += 1;
        }
    }
}

/// One visible ledger row.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub receipt: ExpenseReceipt,
    pub month_label: String,
    /// First row under a new month heading.
    pub starts_month: bool,
}

/// The derived, ready-to-render ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerView {
    pub rows: Vec<LedgerRow>,
    pub counts: FolderCounts,
}

impl LedgerView {
    /// Filter, count, split by folder, sort and group `receipts`.
    pub fn build(receipts: &[ExpenseReceipt], query: &LedgerQuery) -> Self {
        let mut counts = FolderCounts::default();
        let mut visible: Vec<&ExpenseReceipt> = Vec::new();

        for receipt in receipts.iter().filter(|r| query.filter.matches(r)) {
            counts.count(receipt.category);
            if query.folder.contains(receipt.category) {
                visible.push(receipt);
            }
        }

        visible.sort_by(|a, b| query.sort.compare(a, b));

        let mut rows = Vec::with_capacity(visible.len());
        let mut previous_month: Option<String> = None;
        for receipt in visible {
            let month_label = receipt.month_label();
            let starts_month = previous_month.as_deref() != Some(month_label.as_str());
            previous_month = Some(month_label.clone());
            rows.push(LedgerRow {
                receipt: receipt.clone(),
                month_label,
                starts_month,
            });
        }

        Self { rows, counts }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ReceiptId> + '_ {
        self.rows.iter().map(|row| row.receipt.id)
    }
}

/// Checked receipt ids. Survives folder and filter changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ReceiptId>,
}

impl Selection {
    pub fn toggle(&mut self, id: ReceiptId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: &ReceiptId) -> bool {
        self.ids.contains(id)
    }

    pub fn remove(&mut self, id: &ReceiptId) {
        self.ids.remove(id);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of checked rows that are currently visible.
    pub fn selected_in_view(&self, view: &LedgerView) -> usize {
        view.ids().filter(|id| self.ids.contains(id)).count()
    }

    pub fn all_in_view_selected(&self, view: &LedgerView) -> bool {
        !view.is_empty() && self.selected_in_view(view) == view.len()
    }

    /// Header checkbox: uncheck the visible rows when all are checked,
    /// otherwise check them all. Hidden rows keep their state.
    pub fn toggle_all(&mut self, view: &LedgerView) {
        if self.all_in_view_selected(view) {
            for id in view.ids() {
                self.ids.remove(&id);
            }
        } else {
            self.ids.extend(view.ids());
        }
    }

    /// Forget ids that no longer exist.
    pub fn retain_existing(&mut self, receipts: &[ExpenseReceipt]) {
        let live: BTreeSet<ReceiptId> = receipts.iter().map(|r| r.id).collect();
        self.ids.retain(|id| live.contains(id));
    }

    /// Visible rows that are checked, in view order.
    pub fn rows_in_view<'a>(&self, view: &'a LedgerView) -> Vec<&'a ExpenseReceipt> {
        view.rows
            .iter()
            .map(|row| &row.receipt)
            .filter(|r| self.ids.contains(&r.id))
            .collect()
    }
}

/// Pretty JSON of the checked visible rows, without image data.
pub fn export_json(view: &LedgerView, selection: &Selection) -> Result<String, serde_json::Error> {
    let rows: Vec<ReceiptMetadata> = selection
        .rows_in_view(view)
        .into_iter()
        .map(ReceiptMetadata::from)
        .collect();
    serde_json::to_string_pretty(&rows)
}

pub fn export_file_name(folder: Folder) -> String {
    format!("expense-receipts-{}.json", folder.slug())
}

/// Statuses present in `receipts`, in first-seen order.
pub fn distinct_statuses(receipts: &[ExpenseReceipt]) -> Vec<ReceiptStatus> {
    let mut out = Vec::new();
    for r in receipts {
        if !out.contains(&r.status) {
            out.push(r.status);
        }
    }
    out
}

/// Categories present in `receipts`, in first-seen order.
pub fn distinct_categories(receipts: &[ExpenseReceipt]) -> Vec<ExpenseCategory> {
    let mut out = Vec::new();
    for r in receipts {
        if !out.contains(&r.category) {
            out.push(r.category);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;
    use crate::account::AccountId;

    fn receipt(
        no: &str,
        (y, m, d): (i32, u32, u32),
        amount: f64,
        category: ExpenseCategory,
        name: &str,
    ) -> ExpenseReceipt {
        ExpenseReceipt::new(
            AccountId::parse("emp-demo-001").unwrap(),
            name,
            no,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            amount,
            category,
        )
    }

    fn seed() -> Vec<ExpenseReceipt> {
        vec![
            receipt("RCP-1001", (2026, 2, 20), 150.5, ExpenseCategory::Meals, "Juan Dela Cruz"),
            receipt("RCP-1002", (2026, 2, 21), 3500.0, ExpenseCategory::Travel, "Maria Santos"),
            receipt("RCP-1003", (2026, 2, 22), 980.0, ExpenseCategory::OfficeSupplies, "Carlo Reyes"),
            receipt("RCP-1004", (2026, 2, 23), 2200.0, ExpenseCategory::Utilities, "Ana Gomez"),
            receipt("RCP-1005", (2026, 1, 24), 1800.0, ExpenseCategory::Accommodation, "Luis Mendoza"),
        ]
    }

    fn numbers(view: &LedgerView) -> Vec<&str> {
        view.rows.iter().map(|r| r.receipt.receipt_no.as_str()).collect()
    }

    #[test]
    fn default_query_sorts_newest_first_with_month_groups() {
        let view = LedgerView::build(&seed(), &LedgerQuery::default());
        assert_eq!(
            numbers(&view),
            vec!["RCP-1004", "RCP-1003", "RCP-1002", "RCP-1001", "RCP-1005"]
        );
        let starts: Vec<bool> = view.rows.iter().map(|r| r.starts_month).collect();
        assert_eq!(starts, vec![true, false, false, false, true]);
        assert_eq!(view.rows[4].month_label, "JANUARY 2026");
    }

    #[test]
    fn folder_counts_follow_filters_not_folder() {
        let query = LedgerQuery {
            folder: Folder::TravelMeals,
            ..Default::default()
        };
        let view = LedgerView::build(&seed(), &query);
        assert_eq!(view.len(), 3);
        assert_eq!(
            view.counts,
            FolderCounts {
                all: 5,
                travel_meals: 3,
                office_other: 2
            }
        );

        let query = LedgerQuery {
            folder: Folder::TravelMeals,
            filter: LedgerFilter {
                min_amount: Some(1000.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let view = LedgerView::build(&seed(), &query);
        assert_eq!(view.counts.all, 3);
        assert_eq!(view.counts.get(Folder::OfficeOther), 1);
        assert_eq!(numbers(&view), vec!["RCP-1002", "RCP-1005"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let search = |s: &str| {
            let query = LedgerQuery {
                filter: LedgerFilter {
                    search: s.into(),
                    ..Default::default()
                },
                ..Default::default()
            };
            numbers(&LedgerView::build(&seed(), &query))
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };
        assert_eq!(search("maria"), vec!["RCP-1002"]);
        assert_eq!(search("office"), vec!["RCP-1003"]);
        assert_eq!(search("php 150.50"), vec!["RCP-1001"]);
        assert_eq!(search("2026-01"), vec!["RCP-1005"]);
        assert_eq!(search("   ").len(), 5);
    }

    #[test]
    fn date_and_amount_bounds_are_inclusive() {
        let query = LedgerQuery {
            filter: LedgerFilter {
                date_from: NaiveDate::from_ymd_opt(2026, 2, 21),
                date_to: NaiveDate::from_ymd_opt(2026, 2, 22),
                min_amount: Some(980.0),
                max_amount: Some(3500.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let view = LedgerView::build(&seed(), &query);
        assert_eq!(numbers(&view), vec!["RCP-1003", "RCP-1002"]);
        assert!(query.filter.has_advanced());
    }

    #[test]
    fn status_and_category_filters() {
        let mut receipts = seed();
        receipts[0].status = ReceiptStatus::Submitted;
        let query = LedgerQuery {
            filter: LedgerFilter {
                status: Some(ReceiptStatus::Submitted),
                category: Some(ExpenseCategory::Meals),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(numbers(&LedgerView::build(&receipts, &query)), vec!["RCP-1001"]);
        assert_eq!(
            distinct_statuses(&receipts),
            vec![ReceiptStatus::Submitted, ReceiptStatus::Parsed]
        );
        assert_eq!(distinct_categories(&receipts).len(), 5);
    }

    #[test]
    fn header_clicks_toggle_or_reset_direction() {
        let sort = SortState::default();
        let by_amount = sort.click(SortKey::Amount);
        assert_eq!(by_amount.direction, SortDirection::Descending);
        let flipped = by_amount.click(SortKey::Amount);
        assert_eq!(flipped.direction, SortDirection::Ascending);
        let by_name = flipped.click(SortKey::Employee);
        assert_eq!(by_name.direction, SortDirection::Ascending);

        let query = LedgerQuery {
            sort: by_name,
            ..Default::default()
        };
        let view = LedgerView::build(&seed(), &query);
        assert_eq!(view.rows[0].receipt.owner_name, "Ana Gomez");

        let query = LedgerQuery {
            sort: flipped,
            ..Default::default()
        };
        let view = LedgerView::build(&seed(), &query);
        assert_eq!(view.rows[0].receipt.receipt_no, "RCP-1001");
    }

    #[test]
    fn selection_toggle_all_only_touches_visible_rows() {
        let receipts = seed();
        let all = LedgerView::build(&receipts, &LedgerQuery::default());
        let travel = LedgerView::build(
            &receipts,
            &LedgerQuery {
                folder: Folder::TravelMeals,
                ..Default::default()
            },
        );

        let mut selection = Selection::default();
        selection.toggle(receipts[2].id); // office row, hidden in travel
        selection.toggle_all(&travel);
        assert!(selection.all_in_view_selected(&travel));
        assert_eq!(selection.len(), 4);
        assert_eq!(selection.selected_in_view(&all), 4);

        selection.toggle_all(&travel);
        assert_eq!(selection.selected_in_view(&travel), 0);
        assert!(selection.contains(&receipts[2].id));

        selection.toggle(receipts[2].id);
        assert!(selection.is_empty());
    }

    #[test]
    fn export_contains_selected_visible_rows_only() {
        let receipts = seed();
        let view = LedgerView::build(&receipts, &LedgerQuery::default());
        let mut selection = Selection::default();
        selection.toggle(receipts[0].id);
        selection.toggle(receipts[4].id);

        let json = export_json(&view, &selection).unwrap();
        let rows: Vec<ReceiptMetadata> = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].receipt_no, "RCP-1001");
        assert!(!json.contains("image"));
        assert_eq!(
            export_file_name(Folder::TravelMeals),
            "expense-receipts-travel-meals.json"
        );
    }

    #[test]
    fn retain_existing_drops_deleted_ids() {
        let mut receipts = seed();
        let mut selection = Selection::default();
        selection.toggle(receipts[0].id);
        selection.toggle(receipts[1].id);
        receipts.remove(0);
        selection.retain_existing(&receipts);
        assert_eq!(selection.len(), 1);
    }
}
