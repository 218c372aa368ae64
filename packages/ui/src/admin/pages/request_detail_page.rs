//! Account request detail page.

use dioxus::prelude::*;
use portal_core::{AccountRequest, RequestStatus};

use crate::admin::RejectDialog;
use crate::admin::guard::use_admin_guard;
use crate::auth::session_token;
use crate::{RequestBadge, use_session, use_toasts};

/// Props for AdminRequestDetailPage.
#[derive(Props, Clone, PartialEq)]
pub struct AdminRequestDetailPageProps {
    pub account_id: String,
}

/// Request detail page component.
#[component]
pub fn AdminRequestDetailPage(props: AdminRequestDetailPageProps) -> Element {
    use_admin_guard();
    let session = use_session();
    let toasts = use_toasts();

    let mut request = use_signal(|| None::<AccountRequest>);
    let mut loading = use_signal(|| true);
    let mut rejecting = use_signal(|| false);
    let mut busy = use_signal(|| false);

    let account_id = props.account_id.clone();
    let id_for_resource = account_id.clone();
    let _request_resource = use_resource(move || {
        let account_id = id_for_resource.clone();
        async move {
            loading.set(true);
            match api::get_account_request(account_id, session_token(&session)).await {
                Ok(r) => request.set(Some(r)),
                Err(e) => toasts.error(format!("Failed to load request: {}", e)),
            }
            loading.set(false);
        }
    });

    let id_for_approve = account_id.clone();
    let on_approve = move |_| {
        let account_id = id_for_approve.clone();
        let token = session_token(&session);
        spawn(async move {
            busy.set(true);
            match api::approve_account_request(account_id, token).await {
                Ok(r) => {
                    toasts.success(format!("Approved {}", r.account_id));
                    request.set(Some(r));
                }
                Err(e) => toasts.error(format!("Failed to approve: {}", e)),
            }
            busy.set(false);
        });
    };

    let id_for_reject = account_id.clone();
    let on_reject = move |note: Option<String>| {
        let account_id = id_for_reject.clone();
        let token = session_token(&session);
        spawn(async move {
            busy.set(true);
            match api::reject_account_request(account_id, token, note).await {
                Ok(outcome) => {
                    toasts.success(format!(
                        "Rejected {} ({} receipt(s) removed)",
                        outcome.request.account_id, outcome.receipts_removed
                    ));
                    request.set(Some(outcome.request));
                }
                Err(e) => toasts.error(format!("Failed to reject: {}", e)),
            }
            busy.set(false);
            rejecting.set(false);
        });
    };

    rsx! {
        div { class: "page-container",
            nav { class: "breadcrumb",
                Link { to: "/admin/requests", class: "breadcrumb-link", "Requests" }
                span { class: "breadcrumb-separator", "/" }
                span { class: "breadcrumb-current", "{account_id}" }
            }

            if loading() {
                div { class: "loading", "Loading request..." }
            } else if let Some(r) = request() {
                div { class: "page-header",
                    div { class: "page-header-content",
                        div { class: "page-header-title-row",
                            h1 { class: "page-title", "{r.full_name}" }
                            RequestBadge { status: r.status }
                        }
                        p { class: "page-description", "Account ID: {r.account_id}" }
                    }
                    if r.status == RequestStatus::Pending {
                        div { class: "page-header-actions",
                            button {
                                class: "btn btn-success",
                                disabled: busy(),
                                onclick: on_approve,
                                "Approve"
                            }
                            button {
                                class: "btn btn-danger",
                                disabled: busy(),
                                onclick: move |_| rejecting.set(true),
                                "Reject"
                            }
                        }
                    }
                }

                div { class: "card",
                    div { class: "card-header",
                        h2 { class: "card-title", "Details" }
                    }
                    dl { class: "detail-grid",
                        dt { "Department" }
                        dd { {display(&r.department)} }
                        dt { "Email" }
                        dd { {display(&r.email)} }
                        dt { "Phone" }
                        dd { {display(&r.phone)} }
                        dt { "Address" }
                        dd { {display(&r.address)} }
                        dt { "Date of birth" }
                        dd {
                            {r.date_of_birth.map(|d| d.format("%B %d, %Y").to_string()).unwrap_or_else(|| "—".to_string())}
                        }
                        dt { "Requested" }
                        dd { class: "tabular-nums", {r.requested_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()} }
                        if let Some(reviewed) = r.reviewed_at {
                            dt { "Reviewed" }
                            dd { class: "tabular-nums", {reviewed.format("%Y-%m-%d %H:%M:%S UTC").to_string()} }
                        }
                        if let Some(note) = r.review_note.as_ref() {
                            dt { "Note" }
                            dd { "{note}" }
                        }
                    }
                }

                if rejecting() {
                    RejectDialog {
                        account_id: account_id.clone(),
                        busy: busy(),
                        on_confirm: on_reject,
                        on_cancel: move |_| rejecting.set(false),
                    }
                }
            } else {
                div { class: "empty-state",
                    p { "Request not found" }
                }
            }
        }
    }
}

fn display(value: &str) -> String {
    if value.trim().is_empty() {
        "—".to_string()
    } else {
        value.to_string()
    }
}
