//! Status badges and dots.

use dioxus::prelude::*;
use portal_core::{ReceiptStatus, RequestStatus, StatusTone};

/// Badge for a receipt's workflow status.
#[component]
pub fn StatusBadge(status: ReceiptStatus) -> Element {
    rsx! {
        span {
            class: "status-badge tone-{status.tone().as_str()}",
            StatusDot { tone: status.tone() }
            "{status}"
        }
    }
}

/// Badge for an account request's status.
#[component]
pub fn RequestBadge(status: RequestStatus) -> Element {
    let text = match status {
        RequestStatus::Pending => "Pending",
        RequestStatus::Approved => "Approved",
        RequestStatus::Rejected => "Rejected",
    };

    rsx! {
        span {
            class: "status-badge tone-{status.tone().as_str()}",
            {text}
        }
    }
}

/// Coloured dot: green for approved, red for rejected, amber otherwise.
#[component]
pub fn StatusDot(tone: StatusTone) -> Element {
    rsx! {
        span { class: "status-dot dot-{tone.as_str()}" }
    }
}
