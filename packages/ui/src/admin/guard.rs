use dioxus::prelude::*;

use crate::use_session;

/// Send anyone without an admin session back to the landing page.
pub(crate) fn use_admin_guard() {
    let session = use_session();
    let nav = use_navigator();
    use_effect(move || {
        if !session.read().as_ref().is_some_and(|s| s.is_admin()) {
            nav.replace("/");
        }
    });
}
