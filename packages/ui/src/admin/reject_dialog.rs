//! Reject an account request with an optional note.

use dioxus::prelude::*;

#[component]
pub fn RejectDialog(
    account_id: String,
    busy: bool,
    on_confirm: EventHandler<Option<String>>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut note = use_signal(String::new);

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal modal-small", role: "alertdialog",
                div { class: "modal-header",
                    h2 { class: "modal-title", "Reject {account_id}?" }
                }
                div { class: "modal-body",
                    p {
                        "The account will not be able to sign in. Its receipts and stored images are deleted."
                    }
                    div { class: "form-group",
                        label { "Reason (optional)" }
                        textarea {
                            rows: 3,
                            value: "{note}",
                            oninput: move |e| note.set(e.value()),
                        }
                    }
                }
                div { class: "form-actions",
                    button {
                        class: "btn btn-secondary",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        disabled: busy,
                        onclick: move |_| {
                            let text = note();
                            on_confirm.call(if text.trim().is_empty() { None } else { Some(text) });
                        },
                        "Reject"
                    }
                }
            }
        }
    }
}
