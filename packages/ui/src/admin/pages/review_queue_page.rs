//! Receipt review queue - submitted and approved receipts.

use dioxus::prelude::*;
use portal_core::{ExpenseReceipt, ReceiptStatus};

use crate::admin::ReviewActions;
use crate::admin::guard::use_admin_guard;
use crate::auth::session_token;
use crate::{StatusBadge, use_session, use_toasts};

/// Review queue page component.
#[component]
pub fn AdminReviewQueuePage() -> Element {
    use_admin_guard();
    let session = use_session();
    let toasts = use_toasts();

    let mut receipts = use_signal(Vec::<ExpenseReceipt>::new);
    let mut loading = use_signal(|| true);

    let load = move || {
        spawn(async move {
            match api::review_queue(session_token(&session)).await {
                Ok(list) => receipts.set(list),
                Err(e) => toasts.error(format!("Failed to load review queue: {}", e)),
            }
            loading.set(false);
        });
    };

    use_effect(move || load());

    let submitted = receipts
        .read()
        .iter()
        .filter(|r| r.status == ReceiptStatus::Submitted)
        .count();
    let approved = receipts.read().len() - submitted;

    rsx! {
        div { class: "page-container",
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Receipt Review" }
                    p { class: "page-description", "Approve or reject submitted receipts, finalize approved ones" }
                }
                div { class: "page-header-actions",
                    button { class: "btn btn-secondary", onclick: move |_| load(), "Refresh" }
                }
            }

            div { class: "stats-grid stats-grid-sm",
                div { class: "stat-card",
                    div { class: "stat-card-value", "{submitted}" }
                    div { class: "stat-card-label", "Awaiting review" }
                }
                div { class: "stat-card stat-card-success",
                    div { class: "stat-card-value", "{approved}" }
                    div { class: "stat-card-label", "Awaiting finalization" }
                }
            }

            div { class: "card",
                if loading() {
                    div { class: "loading", "Loading receipts..." }
                } else if receipts.read().is_empty() {
                    div { class: "empty-state",
                        p { "Nothing to review" }
                    }
                } else {
                    div { class: "table-container",
                        table { class: "data-table",
                            thead {
                                tr {
                                    th { "Receipt No." }
                                    th { "Employee" }
                                    th { "Date" }
                                    th { "Expense Type" }
                                    th { class: "text-right", "Amount" }
                                    th { "Status" }
                                    th { class: "text-right", "Review" }
                                }
                            }
                            tbody {
                                for receipt in receipts().into_iter() {
                                    tr { class: "data-row", key: "{receipt.id}",
                                        td {
                                            Link {
                                                to: "/admin/receipts/{receipt.id}",
                                                class: "id-link",
                                                "{receipt.receipt_no}"
                                            }
                                        }
                                        td { "{receipt.owner_name}" }
                                        td { class: "tabular-nums", {receipt.date.format("%Y-%m-%d").to_string()} }
                                        td { "{receipt.category.label()}" }
                                        td { class: "text-right tabular-nums", "{receipt.amount_label()}" }
                                        td {
                                            StatusBadge { status: receipt.status }
                                        }
                                        td { class: "text-right",
                                            ReviewActions {
                                                receipt: receipt.clone(),
                                                on_reviewed: move |_| load(),
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
