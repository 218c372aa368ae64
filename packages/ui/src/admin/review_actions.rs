//! Approve / reject / finalize controls for one receipt.

use dioxus::prelude::*;
use api::ReviewDecision;
use portal_core::ExpenseReceipt;

use crate::auth::session_token;
use crate::{use_session, use_toasts};

const DECISIONS: [ReviewDecision; 3] = [
    ReviewDecision::Approve,
    ReviewDecision::Reject,
    ReviewDecision::Finalize,
];

/// Props for ReviewActions.
#[derive(Props, Clone, PartialEq)]
pub struct ReviewActionsProps {
    pub receipt: ExpenseReceipt,
    pub on_reviewed: EventHandler<ExpenseReceipt>,
    /// Show the note field inline.
    #[props(default)]
    pub with_note: bool,
}

#[component]
pub fn ReviewActions(props: ReviewActionsProps) -> Element {
    let session = use_session();
    let toasts = use_toasts();
    let mut note = use_signal(String::new);
    let mut busy = use_signal(|| false);

    let available: Vec<ReviewDecision> = DECISIONS
        .into_iter()
        .filter(|d| props.receipt.status.can_transition_to(d.target()))
        .collect();

    if available.is_empty() {
        return rsx! {
            span { class: "text-muted", "No action needed" }
        };
    }

    let id = props.receipt.id.to_string();
    let on_reviewed = props.on_reviewed;

    rsx! {
        div { class: "review-actions",
            if props.with_note {
                input {
                    class: "review-note",
                    r#type: "text",
                    placeholder: "Note for the employee (optional)",
                    value: "{note}",
                    oninput: move |e| note.set(e.value()),
                }
            }
            for decision in available {
                {
                    let id = id.clone();
                    let class = match decision {
                        ReviewDecision::Reject => "btn btn-small btn-danger",
                        ReviewDecision::Approve => "btn btn-small btn-success",
                        ReviewDecision::Finalize => "btn btn-small btn-primary",
                    };

                    rsx! {
                        button {
                            class: class,
                            disabled: busy(),
                            onclick: move |_| {
                                let id = id.clone();
                                let token = session_token(&session);
                                let text = note();
                                let review_note = if text.trim().is_empty() { None } else { Some(text) };
                                spawn(async move {
                                    busy.set(true);
                                    match api::review_receipt(id, token, decision, review_note).await {
                                        Ok(updated) => {
                                            toasts.success(format!(
                                                "Receipt {} is now {}",
                                                updated.receipt_no, updated.status
                                            ));
                                            on_reviewed.call(updated);
                                        }
                                        Err(e) => toasts.error(format!("Review failed: {}", e)),
                                    }
                                    busy.set(false);
                                });
                            },
                            "{decision.label()}"
                        }
                    }
                }
            }
        }
    }
}
