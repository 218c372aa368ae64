//! Landing page: sign in or request an account.

use chrono::Utc;
use dioxus::prelude::*;
use portal_core::{MIN_PASSWORD_LEN, NewAccountRequest, Session};

use crate::{use_session, use_toasts};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    SignIn,
    Request,
}

/// Landing page with the sign-in and request-account forms.
#[component]
pub fn Landing() -> Element {
    let mut tab = use_signal(|| Tab::SignIn);

    rsx! {
        div { class: "landing",
            div { class: "landing-card",
                div { class: "landing-brand",
                    h1 { class: "landing-title", "Expense Portal" }
                    p { class: "landing-subtitle", "Upload receipts, track reimbursements." }
                }
                div { class: "tab-switcher",
                    button {
                        class: if tab() == Tab::SignIn { "tab active" } else { "tab" },
                        onclick: move |_| tab.set(Tab::SignIn),
                        "Sign In"
                    }
                    button {
                        class: if tab() == Tab::Request { "tab active" } else { "tab" },
                        onclick: move |_| tab.set(Tab::Request),
                        "Request Account"
                    }
                }
                match tab() {
                    Tab::SignIn => rsx! { SignInForm {} },
                    Tab::Request => rsx! {
                        RequestAccountForm { on_submitted: move |_| tab.set(Tab::SignIn) }
                    },
                }
            }
        }
    }
}

fn home_for(session: &Session) -> &'static str {
    if session.is_admin() { "/admin" } else { "/dashboard" }
}

#[component]
fn SignInForm() -> Element {
    let mut session = use_session();
    let toasts = use_toasts();
    let nav = use_navigator();

    let mut account_id = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        if account_id().trim().is_empty() || password().is_empty() {
            toasts.error("Enter your account ID and password");
            return;
        }

        spawn(async move {
            submitting.set(true);
            match api::sign_in(account_id(), password()).await {
                Ok(s) => {
                    toasts.success(format!("Welcome, {}", s.display_name));
                    let target = home_for(&s);
                    session.set(Some(s));
                    password.set(String::new());
                    nav.push(target);
                }
                Err(e) => toasts.error(format!("Sign in failed: {}", e)),
            }
            submitting.set(false);
        });
    };

    rsx! {
        form { class: "landing-form", onsubmit: on_submit,
            div { class: "form-group",
                label { r#for: "signin-account", "Account ID" }
                input {
                    id: "signin-account",
                    r#type: "text",
                    autocomplete: "username",
                    value: "{account_id}",
                    oninput: move |e| account_id.set(e.value()),
                }
            }
            div { class: "form-group",
                label { r#for: "signin-password", "Password" }
                input {
                    id: "signin-password",
                    r#type: "password",
                    autocomplete: "current-password",
                    value: "{password}",
                    oninput: move |e| password.set(e.value()),
                }
            }
            button {
                r#type: "submit",
                class: "btn btn-primary btn-block",
                disabled: submitting(),
                if submitting() { "Signing in..." } else { "Sign In" }
            }
        }
    }
}

#[component]
fn RequestAccountForm(on_submitted: EventHandler<()>) -> Element {
    let toasts = use_toasts();
    let mut form = use_signal(NewAccountRequest::default);
    let mut submitting = use_signal(|| false);

    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        let draft = form();
        if let Err(err) = draft.validate(Utc::now()) {
            toasts.error(err.to_string());
            return;
        }

        spawn(async move {
            submitting.set(true);
            match api::request_account(draft).await {
                Ok(request) => {
                    toasts.success(format!(
                        "Request for '{}' sent. An admin will review it shortly.",
                        request.account_id
                    ));
                    form.set(NewAccountRequest::default());
                    on_submitted.call(());
                }
                Err(e) => toasts.error(format!("Request failed: {}", e)),
            }
            submitting.set(false);
        });
    };

    rsx! {
        form { class: "landing-form", onsubmit: on_submit,
            div { class: "form-row",
                div { class: "form-group",
                    label { "Account ID *" }
                    input {
                        r#type: "text",
                        value: "{form.read().account_id}",
                        oninput: move |e| form.write().account_id = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Full name *" }
                    input {
                        r#type: "text",
                        value: "{form.read().full_name}",
                        oninput: move |e| form.write().full_name = e.value(),
                    }
                }
            }
            div { class: "form-row",
                div { class: "form-group",
                    label { "Password *" }
                    input {
                        r#type: "password",
                        autocomplete: "new-password",
                        placeholder: "At least {MIN_PASSWORD_LEN} characters",
                        value: "{form.read().password}",
                        oninput: move |e| form.write().password = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Confirm password *" }
                    input {
                        r#type: "password",
                        autocomplete: "new-password",
                        value: "{form.read().confirm_password}",
                        oninput: move |e| form.write().confirm_password = e.value(),
                    }
                }
            }
            div { class: "form-row",
                div { class: "form-group",
                    label { "Department" }
                    input {
                        r#type: "text",
                        value: "{form.read().department}",
                        oninput: move |e| form.write().department = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Email *" }
                    input {
                        r#type: "email",
                        value: "{form.read().email}",
                        oninput: move |e| form.write().email = e.value(),
                    }
                }
            }
            div { class: "form-row",
                div { class: "form-group",
                    label { "Phone" }
                    input {
                        r#type: "tel",
                        value: "{form.read().phone}",
                        oninput: move |e| form.write().phone = e.value(),
                    }
                }
                div { class: "form-group",
                    label { "Date of birth" }
                    input {
                        r#type: "date",
                        value: "{form.read().date_of_birth}",
                        oninput: move |e| form.write().date_of_birth = e.value(),
                    }
                }
            }
            div { class: "form-group",
                label { "Address" }
                textarea {
                    rows: 2,
                    value: "{form.read().address}",
                    oninput: move |e| form.write().address = e.value(),
                }
            }
            button {
                r#type: "submit",
                class: "btn btn-primary btn-block",
                disabled: submitting(),
                if submitting() { "Sending..." } else { "Request Account" }
            }
        }
    }
}
