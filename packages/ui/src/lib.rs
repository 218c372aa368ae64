//! This crate contains all shared UI for the expense portal.

// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

mod auth;
pub use auth::{AuthProvider, SignOutButton, use_session};

mod toast;
pub use toast::{ToastHost, Toasts, use_toasts};

mod status_badge;
pub use status_badge::{RequestBadge, StatusBadge, StatusDot};

mod landing;
pub use landing::Landing;

mod profile_panel;
pub use profile_panel::ProfilePanel;

mod download;
mod timer;

pub mod admin;
pub mod dashboard;
