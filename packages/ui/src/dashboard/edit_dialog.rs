//! Receipt edit dialog.

use chrono::Utc;
use dioxus::prelude::*;
use portal_core::{ExpenseCategory, ExpenseReceipt, ReceiptEdit, ReceiptStatus};

use crate::auth::session_token;
use crate::{use_session, use_toasts};

/// Props for EditDialog.
#[derive(Props, Clone, PartialEq)]
pub struct EditDialogProps {
    pub receipt: ExpenseReceipt,
    pub on_saved: EventHandler<ExpenseReceipt>,
    pub on_close: EventHandler<()>,
}

#[component]
pub fn EditDialog(props: EditDialogProps) -> Element {
    let session = use_session();
    let toasts = use_toasts();

    let receipt = props.receipt.clone();
    let initial = ReceiptEdit::from_receipt(&receipt);
    let mut edit = use_signal(move || initial);
    let mut saving = use_signal(|| false);

    // Owners may pick Parsed or Submitted; a rejected receipt keeps its own status available.
    let status_options: Vec<ReceiptStatus> = ReceiptStatus::ALL
        .into_iter()
        .filter(|s| s.owner_selectable() || *s == receipt.status)
        .collect();

    let on_saved = props.on_saved;
    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        let value = edit();

        let mut preview = receipt.clone();
        if let Err(err) = value.apply(&mut preview, Utc::now()) {
            toasts.error(err.to_string());
            return;
        }

        let token = session_token(&session);
        let id = receipt.id.to_string();
        spawn(async move {
            saving.set(true);
            match api::update_receipt(id, token, value).await {
                Ok(updated) => {
                    toasts.success(format!("Receipt {} updated", updated.receipt_no));
                    on_saved.call(updated);
                }
                Err(e) => toasts.error(format!("Could not update receipt: {}", e)),
            }
            saving.set(false);
        });
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                div { class: "modal-header",
                    h2 { class: "modal-title", "Edit Receipt" }
                    button {
                        class: "modal-close",
                        onclick: move |_| props.on_close.call(()),
                        "×"
                    }
                }
                form { class: "modal-body", onsubmit: on_submit,
                    div { class: "form-row",
                        div { class: "form-group",
                            label { "Receipt No." }
                            input {
                                r#type: "text",
                                value: "{edit.read().receipt_no}",
                                oninput: move |e| edit.write().receipt_no = e.value(),
                            }
                        }
                        div { class: "form-group",
                            label { "Date" }
                            input {
                                r#type: "date",
                                value: "{edit.read().date}",
                                oninput: move |e| edit.write().date = e.value(),
                            }
                        }
                    }
                    div { class: "form-group",
                        label { "Employee name" }
                        input {
                            r#type: "text",
                            value: "{edit.read().owner_name}",
                            oninput: move |e| edit.write().owner_name = e.value(),
                        }
                    }
                    div { class: "form-row",
                        div { class: "form-group",
                            label { "Expense type" }
                            select {
                                value: "{edit.read().category}",
                                onchange: move |e| edit.write().category = e.value(),
                                for category in ExpenseCategory::ALL {
                                    option {
                                        value: "{category.label()}",
                                        selected: edit.read().category == category.label(),
                                        "{category.label()}"
                                    }
                                }
                            }
                        }
                        div { class: "form-group",
                            label { "Amount" }
                            input {
                                r#type: "text",
                                inputmode: "decimal",
                                value: "{edit.read().amount}",
                                oninput: move |e| edit.write().amount = e.value(),
                            }
                        }
                    }
                    div { class: "form-row",
                        div { class: "form-group",
                            label { "Status" }
                            select {
                                value: "{edit.read().status}",
                                onchange: move |e| edit.write().status = e.value(),
                                for status in status_options.iter() {
                                    option {
                                        value: "{status.as_str()}",
                                        selected: edit.read().status == status.as_str(),
                                        "{status}"
                                    }
                                }
                            }
                        }
                        div { class: "form-group",
                            label { "Description" }
                            input {
                                r#type: "text",
                                value: "{edit.read().source_text}",
                                oninput: move |e| edit.write().source_text = e.value(),
                            }
                        }
                    }
                    div { class: "form-actions",
                        button {
                            r#type: "button",
                            class: "btn btn-secondary",
                            onclick: move |_| props.on_close.call(()),
                            "Cancel"
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary",
                            disabled: saving(),
                            if saving() { "Saving..." } else { "Save Changes" }
                        }
                    }
                }
            }
        }
    }
}
