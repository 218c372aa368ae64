//! Recent portal activity for admins.

use dioxus::prelude::*;

use crate::auth::session_token;
use crate::use_session;

const FEED_LIMIT: usize = 15;

#[component]
pub fn ActivityFeed() -> Element {
    let session = use_session();

    let mut events = use_resource(move || async move {
        api::recent_events(session_token(&session), Some(FEED_LIMIT))
            .await
            .unwrap_or_default()
    });

    let list = events.read().clone().unwrap_or_default();

    rsx! {
        div { class: "card",
            div { class: "card-header",
                h2 { class: "card-title", "Recent Activity" }
                button {
                    class: "btn btn-small btn-ghost",
                    onclick: move |_| events.restart(),
                    "Refresh"
                }
            }
            if list.is_empty() {
                div { class: "empty-state",
                    p { "No activity yet" }
                }
            } else {
                ul { class: "activity-list",
                    for event in list.into_iter() {
                        li { class: "activity-item",
                            span { class: "activity-time tabular-nums",
                                {event.timestamp().format("%H:%M:%S").to_string()}
                            }
                            span { class: "activity-text", "{event.description()}" }
                        }
                    }
                }
            }
        }
    }
}
