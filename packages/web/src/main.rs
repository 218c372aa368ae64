// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

use dioxus::prelude::*;

use ui::admin::pages::{
    AdminReceiptDetailPage, AdminRequestDetailPage, AdminRequestsPage, AdminReviewQueuePage,
};
use ui::admin::NotificationBell;
use ui::dashboard::Dashboard;
use ui::{AuthProvider, Landing, SignOutButton, ToastHost, use_session};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},

    // Employee ledger
    #[route("/dashboard")]
    DashboardAll {},
    #[route("/dashboard/:folder")]
    DashboardFolder { folder: String },

    // Admin routes with sidebar navigation
    #[layout(AdminLayout)]
        #[route("/admin")]
        AdminRedirect {},
        #[route("/admin/requests")]
        AdminRequests {},
        #[route("/admin/requests/:account_id")]
        AdminRequestDetail { account_id: String },
        #[route("/admin/receipts")]
        AdminReceipts {},
        #[route("/admin/receipts/:receipt_id")]
        AdminReceiptDetail { receipt_id: String },
}

const FAVICON: Asset = asset!("/assets/favicon.svg");
const MAIN_CSS: Asset = asset!("/assets/main.css");
const ADMIN_CSS: Asset = asset!("/assets/admin.css");

fn main() {
    #[cfg(feature = "server")]
    {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .init();
        tracing::info!("Starting expense portal");
    }

    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ADMIN_CSS }

        AuthProvider {
            ToastHost {
                Router::<Route> {}
            }
        }
    }
}

/// Sign-in and account request page.
#[component]
fn Home() -> Element {
    rsx! {
        Landing {}
    }
}

/// Ledger showing every folder.
#[component]
fn DashboardAll() -> Element {
    rsx! {
        Dashboard {}
    }
}

/// Ledger narrowed to one folder tab.
#[component]
fn DashboardFolder(folder: String) -> Element {
    rsx! {
        Dashboard { folder }
    }
}

/// Layout for admin routes with sidebar navigation.
#[component]
fn AdminLayout() -> Element {
    let session = use_session();
    let admin_name = session
        .read()
        .as_ref()
        .map(|s| s.display_name.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "admin-layout",
            // Sidebar navigation
            aside { class: "admin-sidebar",
                div { class: "sidebar-header",
                    h1 { class: "sidebar-logo", "Expense Portal" }
                    NotificationBell {}
                }
                nav { class: "sidebar-nav",
                    div { class: "nav-section",
                        span { class: "nav-section-title", "Admin" }
                        Link {
                            to: Route::AdminRequests {},
                            class: "nav-link",
                            active_class: "active",
                            span { class: "nav-icon", "☰" }
                            span { "Account Requests" }
                        }
                        Link {
                            to: Route::AdminReceipts {},
                            class: "nav-link",
                            active_class: "active",
                            span { class: "nav-icon", "✓" }
                            span { "Receipt Review" }
                        }
                    }
                }
                div { class: "sidebar-footer",
                    span { class: "sidebar-user", "{admin_name}" }
                    SignOutButton { class: "nav-link nav-link-muted" }
                }
            }

            // Main content area
            main { class: "admin-main",
                Outlet::<Route> {}
            }
        }
    }
}

/// Redirect /admin to /admin/requests.
#[component]
fn AdminRedirect() -> Element {
    let nav = use_navigator();
    use_effect(move || {
        nav.push(Route::AdminRequests {});
    });
    rsx! {}
}

#[component]
fn AdminRequests() -> Element {
    rsx! {
        AdminRequestsPage {}
    }
}

#[component]
fn AdminRequestDetail(account_id: String) -> Element {
    rsx! {
        AdminRequestDetailPage { account_id }
    }
}

#[component]
fn AdminReceipts() -> Element {
    rsx! {
        AdminReviewQueuePage {}
    }
}

#[component]
fn AdminReceiptDetail(receipt_id: String) -> Element {
    rsx! {
        AdminReceiptDetailPage { receipt_id }
    }
}
