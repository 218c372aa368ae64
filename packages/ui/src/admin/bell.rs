//! Notification bell that polls for pending account requests.

use dioxus::prelude::*;
use portal_core::AccountRequest;

use crate::auth::session_token;
use crate::timer::sleep_ms;
use crate::{use_session, use_toasts};

/// Poll interval in milliseconds (10 seconds).
const POLL_INTERVAL_MS: u32 = 10_000;

#[component]
pub fn NotificationBell() -> Element {
    let session = use_session();
    let toasts = use_toasts();
    let mut pending = use_signal(Vec::<AccountRequest>::new);
    let mut open = use_signal(|| false);

    let _poller = use_coroutine(move |_rx: UnboundedReceiver<()>| async move {
        let mut seen: Option<usize> = None;
        loop {
            let token = session_token(&session);
            if !token.is_empty() {
                match api::list_account_requests(token, Some("pending".to_string())).await {
                    Ok(list) => {
                        if let Some(previous) = seen
                            && list.len() > previous
                        {
                            let new = list.len() - previous;
                            toasts.info(format!("{} new account request(s)", new));
                        }
                        seen = Some(list.len());
                        pending.set(list);
                    }
                    Err(e) => tracing::debug!("Pending request poll failed: {}", e),
                }
            }

            sleep_ms(POLL_INTERVAL_MS).await;
        }
    });

    let count = pending.read().len();

    rsx! {
        div { class: "bell",
            button {
                class: "bell-button",
                title: "Pending account requests",
                onclick: move |_| open.toggle(),
                span { class: "bell-icon", "🔔" }
                if count > 0 {
                    span { class: "bell-count", "{count}" }
                }
            }
            if open() {
                div { class: "bell-dropdown",
                    div { class: "bell-dropdown-header", "Pending requests" }
                    if count == 0 {
                        div { class: "bell-empty", "Nothing waiting" }
                    }
                    for request in pending().into_iter() {
                        Link {
                            to: "/admin/requests/{request.account_id}",
                            class: "bell-item",
                            onclick: move |_| open.set(false),
                            span { class: "bell-item-name", "{request.full_name}" }
                            span { class: "bell-item-meta",
                                {request.requested_at.format("%b %d, %H:%M").to_string()}
                            }
                        }
                    }
                }
            }
        }
    }
}
