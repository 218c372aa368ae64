//! Search box, dropdown filters and the collapsible advanced filters.

use chrono::NaiveDate;
use dioxus::prelude::*;
use portal_core::{ExpenseCategory, LedgerFilter, ReceiptStatus, parse_amount};

/// Props for FilterBar.
#[derive(Props, Clone, PartialEq)]
pub struct FilterBarProps {
    /// Raw search box text; applied to the filter after a debounce.
    pub search: String,
    pub filter: LedgerFilter,
    /// Statuses offered in the status dropdown.
    pub statuses: Vec<ReceiptStatus>,
    /// Categories offered in the expense type dropdown.
    pub categories: Vec<ExpenseCategory>,
    pub show_advanced: bool,
    pub on_search: EventHandler<String>,
    pub on_change: EventHandler<LedgerFilter>,
    pub on_toggle_advanced: EventHandler<()>,
    pub on_reset: EventHandler<()>,
}

fn date_value(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn amount_value(amount: Option<f64>) -> String {
    amount.map(|a| format!("{a}")).unwrap_or_default()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[component]
pub fn FilterBar(props: FilterBarProps) -> Element {
    let filter = props.filter.clone();
    let on_change = props.on_change;

    let status_value = filter.status.map(|s| s.as_str().to_string()).unwrap_or_default();
    let category_value = filter
        .category
        .map(|c| c.label().to_string())
        .unwrap_or_default();

    let for_status = filter.clone();
    let for_category = filter.clone();
    let for_from = filter.clone();
    let for_to = filter.clone();
    let for_min = filter.clone();
    let for_max = filter.clone();

    rsx! {
        div { class: "filter-bar",
            div { class: "filter-row",
                input {
                    class: "filter-search",
                    r#type: "search",
                    placeholder: "Search receipts...",
                    value: "{props.search}",
                    oninput: move |e| props.on_search.call(e.value()),
                }
                select {
                    class: "filter-select",
                    value: "{status_value}",
                    onchange: move |e| {
                        let mut next = for_status.clone();
                        next.status = e.value().parse().ok();
                        on_change.call(next);
                    },
                    option { value: "", "All Statuses" }
                    for status in props.statuses.iter() {
                        option {
                            value: "{status.as_str()}",
                            selected: filter.status == Some(*status),
                            "{status}"
                        }
                    }
                }
                select {
                    class: "filter-select",
                    value: "{category_value}",
                    onchange: move |e| {
                        let mut next = for_category.clone();
                        next.category = e.value().parse().ok();
                        on_change.call(next);
                    },
                    option { value: "", "All Expense Types" }
                    for category in props.categories.iter() {
                        option {
                            value: "{category.label()}",
                            selected: filter.category == Some(*category),
                            "{category.label()}"
                        }
                    }
                }
                button {
                    class: if props.show_advanced || filter.has_advanced() { "btn btn-secondary active" } else { "btn btn-secondary" },
                    onclick: move |_| props.on_toggle_advanced.call(()),
                    if props.show_advanced { "Hide Filters" } else { "More Filters" }
                }
            }

            if props.show_advanced {
                div { class: "filter-advanced",
                    div { class: "form-group",
                        label { "From" }
                        input {
                            r#type: "date",
                            value: "{date_value(filter.date_from)}",
                            onchange: move |e| {
                                let mut next = for_from.clone();
                                next.date_from = parse_date(&e.value());
                                on_change.call(next);
                            },
                        }
                    }
                    div { class: "form-group",
                        label { "To" }
                        input {
                            r#type: "date",
                            value: "{date_value(filter.date_to)}",
                            onchange: move |e| {
                                let mut next = for_to.clone();
                                next.date_to = parse_date(&e.value());
                                on_change.call(next);
                            },
                        }
                    }
                    div { class: "form-group",
                        label { "Min amount" }
                        input {
                            r#type: "number",
                            min: "0",
                            step: "0.01",
                            value: "{amount_value(filter.min_amount)}",
                            onchange: move |e| {
                                let mut next = for_min.clone();
                                next.min_amount = parse_amount(&e.value());
                                on_change.call(next);
                            },
                        }
                    }
                    div { class: "form-group",
                        label { "Max amount" }
                        input {
                            r#type: "number",
                            min: "0",
                            step: "0.01",
                            value: "{amount_value(filter.max_amount)}",
                            onchange: move |e| {
                                let mut next = for_max.clone();
                                next.max_amount = parse_amount(&e.value());
                                on_change.call(next);
                            },
                        }
                    }
                    button {
                        class: "btn btn-link",
                        onclick: move |_| props.on_reset.call(()),
                        "Reset all"
                    }
                }
            }
        }
    }
}
