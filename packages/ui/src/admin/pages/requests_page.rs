//! Account requests page - lists requests with a status filter.

use dioxus::prelude::*;
use portal_core::{AccountRequest, RequestStatus};

use crate::admin::guard::use_admin_guard;
use crate::admin::{ActivityFeed, RejectDialog};
use crate::auth::session_token;
use crate::{RequestBadge, use_session, use_toasts};

/// Account requests page component.
#[component]
pub fn AdminRequestsPage() -> Element {
    use_admin_guard();
    let session = use_session();
    let toasts = use_toasts();

    let mut status_filter = use_signal(|| Some(RequestStatus::Pending));
    let mut requests = use_signal(Vec::<AccountRequest>::new);
    let mut loading = use_signal(|| true);
    let mut rejecting = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    // Reload whenever the filter changes
    let _requests_resource = use_resource(move || async move {
        let token = session_token(&session);
        let status = status_filter().map(|s| s.as_str().to_string());
        loading.set(true);
        match api::list_account_requests(token, status).await {
            Ok(list) => requests.set(list),
            Err(e) => toasts.error(format!("Failed to load requests: {}", e)),
        }
        loading.set(false);
    });

    let refresh = move || {
        spawn(async move {
            let token = session_token(&session);
            let status = status_filter().map(|s| s.as_str().to_string());
            if let Ok(list) = api::list_account_requests(token, status).await {
                requests.set(list);
            }
        });
    };

    let on_approve = move |account_id: String| {
        let token = session_token(&session);
        spawn(async move {
            match api::approve_account_request(account_id, token).await {
                Ok(request) => {
                    toasts.success(format!("Approved {}", request.account_id));
                    refresh();
                }
                Err(e) => toasts.error(format!("Failed to approve: {}", e)),
            }
        });
    };

    let on_reject = move |note: Option<String>| {
        let Some(account_id) = rejecting() else {
            return;
        };
        let token = session_token(&session);
        spawn(async move {
            busy.set(true);
            match api::reject_account_request(account_id, token, note).await {
                Ok(outcome) => {
                    toasts.success(format!(
                        "Rejected {} ({} receipt(s) removed)",
                        outcome.request.account_id, outcome.receipts_removed
                    ));
                    refresh();
                }
                Err(e) => toasts.error(format!("Failed to reject: {}", e)),
            }
            busy.set(false);
            rejecting.set(None);
        });
    };

    let filter_value = status_filter().map(|s| s.as_str()).unwrap_or("");

    rsx! {
        div { class: "page-container",
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Account Requests" }
                    p { class: "page-description", "Approve or reject new employee accounts" }
                }
                div { class: "page-header-actions",
                    select {
                        class: "filter-select",
                        value: "{filter_value}",
                        onchange: move |e| status_filter.set(e.value().parse().ok()),
                        option { value: "", "All" }
                        for status in RequestStatus::ALL {
                            option {
                                value: "{status.as_str()}",
                                selected: status_filter() == Some(status),
                                "{status.as_str()}"
                            }
                        }
                    }
                }
            }

            div { class: "card",
                div { class: "card-header",
                    h2 { class: "card-title", "Requests" }
                    span { class: "card-count", "{requests().len()} total" }
                }

                if loading() {
                    div { class: "loading", "Loading requests..." }
                } else if requests().is_empty() {
                    div { class: "empty-state",
                        p { "No account requests" }
                    }
                } else {
                    div { class: "table-container",
                        table { class: "data-table",
                            thead {
                                tr {
                                    th { "Account ID" }
                                    th { "Name" }
                                    th { "Department" }
                                    th { "Requested" }
                                    th { "Status" }
                                    th { class: "text-right", "Actions" }
                                }
                            }
                            tbody {
                                for request in requests().into_iter() {
                                    {
                                        let account_id = request.account_id.to_string();
                                        let for_approve = account_id.clone();
                                        let for_reject = account_id.clone();
                                        let requested = request.requested_at.format("%Y-%m-%d %H:%M").to_string();
                                        let pending = request.status == RequestStatus::Pending;

                                        rsx! {
                                            tr { class: "data-row",
                                                td {
                                                    Link {
                                                        to: "/admin/requests/{account_id}",
                                                        class: "id-link",
                                                        "{account_id}"
                                                    }
                                                }
                                                td { "{request.full_name}" }
                                                td { "{request.department}" }
                                                td { class: "text-muted tabular-nums", "{requested}" }
                                                td {
                                                    RequestBadge { status: request.status }
                                                }
                                                td { class: "text-right row-actions",
                                                    if pending {
                                                        button {
                                                            class: "btn btn-small btn-success",
                                                            onclick: move |_| on_approve(for_approve.clone()),
                                                            "Approve"
                                                        }
                                                        button {
                                                            class: "btn btn-small btn-danger",
                                                            onclick: move |_| rejecting.set(Some(for_reject.clone())),
                                                            "Reject"
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

            ActivityFeed {}

            if let Some(account_id) = rejecting() {
                RejectDialog {
                    account_id,
                    busy: busy(),
                    on_confirm: on_reject,
                    on_cancel: move |_| rejecting.set(None),
                }
            }
        }
    }
}
