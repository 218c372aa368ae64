//! Receipt detail page - one receipt with its image and review controls.

use dioxus::prelude::*;
use portal_core::ExpenseReceipt;

use crate::admin::ReviewActions;
use crate::admin::guard::use_admin_guard;
use crate::auth::session_token;
use crate::dashboard::Lightbox;
use crate::{StatusBadge, use_session, use_toasts};

/// Props for AdminReceiptDetailPage.
#[derive(Props, Clone, PartialEq)]
pub struct AdminReceiptDetailPageProps {
    pub receipt_id: String,
}

/// Receipt detail page component.
#[component]
pub fn AdminReceiptDetailPage(props: AdminReceiptDetailPageProps) -> Element {
    use_admin_guard();
    let session = use_session();
    let toasts = use_toasts();

    let mut receipt = use_signal(|| None::<ExpenseReceipt>);
    let mut image = use_signal(|| None::<String>);
    let mut loading = use_signal(|| true);
    let mut zoomed = use_signal(|| false);

    let receipt_id = props.receipt_id.clone();
    let _receipt_resource = use_resource(move || {
        let id = receipt_id.clone();
        async move {
            loading.set(true);
            let token = session_token(&session);
            match api::get_receipt(id.clone(), token.clone()).await {
                Ok(r) => {
                    let has_image = r.image.is_some();
                    receipt.set(Some(r));
                    if has_image {
                        match api::receipt_image(id, token).await {
                            Ok(src) => image.set(src),
                            Err(e) => tracing::warn!("Failed to load receipt image: {}", e),
                        }
                    }
                }
                Err(e) => toasts.error(format!("Failed to load receipt: {}", e)),
            }
            loading.set(false);
        }
    });

    rsx! {
        div { class: "page-container",
            nav { class: "breadcrumb",
                Link { to: "/admin/receipts", class: "breadcrumb-link", "Review" }
                span { class: "breadcrumb-separator", "/" }
                span { class: "breadcrumb-current",
                    {receipt().map(|r| r.receipt_no.clone()).unwrap_or_else(|| "Loading...".to_string())}
                }
            }

            if loading() {
                div { class: "loading", "Loading receipt..." }
            } else if let Some(r) = receipt() {
                div { class: "page-header",
                    div { class: "page-header-content",
                        div { class: "page-header-title-row",
                            h1 { class: "page-title", "{r.receipt_no}" }
                            StatusBadge { status: r.status }
                        }
                        p { class: "page-description", "{r.owner_name} · {r.account_id}" }
                    }
                    div { class: "page-header-actions",
                        ReviewActions {
                            receipt: r.clone(),
                            with_note: true,
                            on_reviewed: move |updated| receipt.set(Some(updated)),
                        }
                    }
                }

                div { class: "detail-layout",
                    div { class: "card",
                        div { class: "card-header",
                            h2 { class: "card-title", "Receipt" }
                        }
                        dl { class: "detail-grid",
                            dt { "Date" }
                            dd { class: "tabular-nums", {r.date.format("%B %d, %Y").to_string()} }
                            dt { "Amount" }
                            dd { class: "tabular-nums", "{r.amount_label()}" }
                            dt { "Expense type" }
                            dd { "{r.category.label()}" }
                            if !r.source_text.is_empty() {
                                dt { "Description" }
                                dd { "{r.source_text}" }
                            }
                            if let Some(note) = r.review_note.as_ref() {
                                dt { "Review note" }
                                dd { "{note}" }
                            }
                            dt { "Uploaded" }
                            dd { class: "tabular-nums", {r.created_at.format("%Y-%m-%d %H:%M").to_string()} }
                            dt { "Last change" }
                            dd { class: "tabular-nums", {r.updated_at.format("%Y-%m-%d %H:%M").to_string()} }
                        }
                    }

                    div { class: "card receipt-image-card",
                        if let Some(src) = image() {
                            img {
                                class: "receipt-thumb",
                                src: "{src}",
                                alt: "Receipt {r.receipt_no}",
                                onclick: move |_| zoomed.set(true),
                            }
                        } else {
                            div { class: "empty-state",
                                p { "No image stored for this receipt" }
                            }
                        }
                    }
                }

                if zoomed() {
                    if let Some(src) = image() {
                        Lightbox {
                            title: r.receipt_no.clone(),
                            src,
                            on_close: move |_| zoomed.set(false),
                        }
                    }
                }
            } else {
                div { class: "empty-state",
                    p { "Receipt not found" }
                }
            }
        }
    }
}
