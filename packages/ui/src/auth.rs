//! Signed-in session shared through context.

use dioxus::prelude::*;
use portal_core::Session;

/// Provides the session signal to everything below it.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(None::<Session>));
    rsx! { {children} }
}

/// The current session, `None` when signed out.
pub fn use_session() -> Signal<Option<Session>> {
    use_context::<Signal<Option<Session>>>()
}

/// Token of the current session, or an empty string.
pub(crate) fn session_token(session: &Signal<Option<Session>>) -> String {
    session
        .read()
        .as_ref()
        .map(|s| s.token.clone())
        .unwrap_or_default()
}

/// Ends the session on the server and forgets it locally.
#[component]
pub fn SignOutButton(#[props(default = "btn btn-ghost".to_string())] class: String) -> Element {
    let mut session = use_session();
    let nav = use_navigator();

    let on_click = move |_| {
        let token = session_token(&session);
        spawn(async move {
            if let Err(e) = api::sign_out(token).await {
                tracing::warn!("Sign out failed: {}", e);
            }
            session.set(None);
            nav.replace("/");
        });
    };

    rsx! {
        button { class: "{class}", onclick: on_click, "Sign Out" }
    }
}
