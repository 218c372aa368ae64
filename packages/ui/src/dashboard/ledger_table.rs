//! Sortable receipt table with month separator rows.

use dioxus::prelude::*;
use portal_core::{ExpenseReceipt, LedgerView, ReceiptId, ReceiptStatus, Selection, SortKey, SortState};

use crate::StatusBadge;

/// Props for LedgerTable.
#[derive(Props, Clone, PartialEq)]
pub struct LedgerTableProps {
    pub view: LedgerView,
    pub sort: SortState,
    pub selection: Selection,
    pub on_sort: EventHandler<SortKey>,
    pub on_toggle: EventHandler<ReceiptId>,
    pub on_toggle_all: EventHandler<()>,
    /// Open the receipt image in the lightbox.
    pub on_open: EventHandler<ExpenseReceipt>,
    pub on_download: EventHandler<ExpenseReceipt>,
    pub on_edit: EventHandler<ExpenseReceipt>,
    pub on_delete: EventHandler<ExpenseReceipt>,
    pub on_submit: EventHandler<ExpenseReceipt>,
}

const COLUMN_COUNT: usize = 8;

#[component]
pub fn LedgerTable(props: LedgerTableProps) -> Element {
    let all_selected = props.selection.all_in_view_selected(&props.view);
    let sort = props.sort;

    rsx! {
        div { class: "table-container",
            table { class: "data-table ledger-table",
                thead {
                    tr {
                        th { class: "col-check",
                            input {
                                r#type: "checkbox",
                                checked: all_selected,
                                disabled: props.view.is_empty(),
                                onchange: move |_| props.on_toggle_all.call(()),
                            }
                        }
                        for key in SortKey::ALL {
                            th {
                                class: if sort.key == key { "sortable sorted" } else { "sortable" },
                                onclick: move |_| props.on_sort.call(key),
                                "{key.label()}"
                                if sort.key == key {
                                    span { class: "sort-arrow", "{sort.direction.arrow()}" }
                                }
                            }
                        }
                        th { class: "text-right", "Actions" }
                    }
                }
                tbody {
                    for row in props.view.rows.iter() {
                        if row.starts_month {
                            tr { class: "month-row",
                                td { colspan: "{COLUMN_COUNT}", "{row.month_label}" }
                            }
                        }
                        LedgerRowView {
                            receipt: row.receipt.clone(),
                            checked: props.selection.contains(&row.receipt.id),
                            on_toggle: props.on_toggle,
                            on_open: props.on_open,
                            on_download: props.on_download,
                            on_edit: props.on_edit,
                            on_delete: props.on_delete,
                            on_submit: props.on_submit,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LedgerRowView(
    receipt: ExpenseReceipt,
    checked: bool,
    on_toggle: EventHandler<ReceiptId>,
    on_open: EventHandler<ExpenseReceipt>,
    on_download: EventHandler<ExpenseReceipt>,
    on_edit: EventHandler<ExpenseReceipt>,
    on_delete: EventHandler<ExpenseReceipt>,
    on_submit: EventHandler<ExpenseReceipt>,
) -> Element {
    let id = receipt.id;
    let date = receipt.date.format("%b %d, %Y").to_string();
    let editable = receipt.status.is_owner_editable();
    let submittable = receipt.status.can_transition_to(ReceiptStatus::Submitted);
    let has_image = receipt.image.is_some();

    let for_open = receipt.clone();
    let for_download = receipt.clone();
    let for_edit = receipt.clone();
    let for_delete = receipt.clone();
    let for_submit = receipt.clone();

    rsx! {
        tr { class: if checked { "data-row selected" } else { "data-row" },
            td { class: "col-check",
                input {
                    r#type: "checkbox",
                    checked: checked,
                    onchange: move |_| on_toggle.call(id),
                }
            }
            td { class: "tabular-nums", "{date}" }
            td {
                if has_image {
                    button {
                        class: "link-button",
                        title: "View receipt image",
                        onclick: move |_| on_open.call(for_open.clone()),
                        "{receipt.receipt_no}"
                    }
                } else {
                    "{receipt.receipt_no}"
                }
                if !receipt.source_text.is_empty() {
                    div { class: "cell-hint", "{receipt.source_text}" }
                }
            }
            td { "{receipt.owner_name}" }
            td { "{receipt.category.label()}" }
            td { class: "text-right tabular-nums", "{receipt.amount_label()}" }
            td {
                StatusBadge { status: receipt.status }
                if let Some(note) = receipt.review_note.as_ref() {
                    div { class: "cell-hint", title: "{note}", "{note}" }
                }
            }
            td { class: "text-right row-actions",
                button {
                    class: "btn btn-small btn-ghost",
                    title: if has_image { "Download image" } else { "Download details" },
                    onclick: move |_| on_download.call(for_download.clone()),
                    "Download"
                }
                if editable {
                    button {
                        class: "btn btn-small btn-ghost",
                        onclick: move |_| on_edit.call(for_edit.clone()),
                        "Edit"
                    }
                    button {
                        class: "btn btn-small btn-danger-ghost",
                        onclick: move |_| on_delete.call(for_delete.clone()),
                        "Delete"
                    }
                }
                if submittable {
                    button {
                        class: "btn btn-small btn-primary",
                        onclick: move |_| on_submit.call(for_submit.clone()),
                        "Submit"
                    }
                }
            }
        }
    }
}
