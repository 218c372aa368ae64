//! Create or edit the signed-in employee's profile.

use dioxus::prelude::*;
use portal_core::{Profile, ProfileDraft};

use crate::auth::session_token;
use crate::{use_session, use_toasts};

/// Props for ProfilePanel.
#[derive(Props, Clone, PartialEq)]
pub struct ProfilePanelProps {
    /// Existing profile to prefill, if any.
    #[props(!optional)]
    pub profile: Option<Profile>,
    /// Shown above the form, e.g. when an upload needs a profile first.
    #[props(!optional)]
    pub notice: Option<String>,
    pub on_saved: EventHandler<Profile>,
    pub on_close: EventHandler<()>,
}

/// Modal profile form.
#[component]
pub fn ProfilePanel(props: ProfilePanelProps) -> Element {
    let session = use_session();
    let toasts = use_toasts();

    let initial = props
        .profile
        .as_ref()
        .map(ProfileDraft::from_profile)
        .unwrap_or_else(|| ProfileDraft {
            name: session
                .read()
                .as_ref()
                .map(|s| s.display_name.clone())
                .unwrap_or_default(),
            ..ProfileDraft::default()
        });
    let mut draft = use_signal(move || initial);
    let mut saving = use_signal(|| false);

    let on_saved = props.on_saved;
    let on_submit = move |e: FormEvent| {
        e.prevent_default();
        let token = session_token(&session);
        let value = draft();
        spawn(async move {
            saving.set(true);
            match api::save_profile(token, value).await {
                Ok(profile) => {
                    toasts.success("Profile saved");
                    on_saved.call(profile);
                }
                Err(e) => toasts.error(format!("Could not save profile: {}", e)),
            }
            saving.set(false);
        });
    };

    let title = if props.profile.is_some() { "Edit Profile" } else { "Create Profile" };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal profile-panel",
                div { class: "modal-header",
                    h2 { class: "modal-title", "{title}" }
                    button {
                        class: "modal-close",
                        onclick: move |_| props.on_close.call(()),
                        "×"
                    }
                }

                if let Some(notice) = props.notice.as_ref() {
                    div { class: "notice-banner", "{notice}" }
                }

                form { class: "modal-body", onsubmit: on_submit,
                    div { class: "form-group",
                        label { "Name *" }
                        input {
                            r#type: "text",
                            value: "{draft.read().name}",
                            oninput: move |e| draft.write().name = e.value(),
                        }
                    }
                    div { class: "form-row",
                        div { class: "form-group",
                            label { "Department" }
                            input {
                                r#type: "text",
                                value: "{draft.read().department}",
                                oninput: move |e| draft.write().department = e.value(),
                            }
                        }
                        div { class: "form-group",
                            label { "Date of birth" }
                            input {
                                r#type: "date",
                                value: "{draft.read().date_of_birth}",
                                oninput: move |e| draft.write().date_of_birth = e.value(),
                            }
                        }
                    }
                    div { class: "form-row",
                        div { class: "form-group",
                            label { "Email *" }
                            input {
                                r#type: "email",
                                value: "{draft.read().email}",
                                oninput: move |e| draft.write().email = e.value(),
                            }
                        }
                        div { class: "form-group",
                            label { "Phone" }
                            input {
                                r#type: "tel",
                                value: "{draft.read().phone}",
                                oninput: move |e| draft.write().phone = e.value(),
                            }
                        }
                    }
                    div { class: "form-group",
                        label { "Address" }
                        textarea {
                            rows: 2,
                            value: "{draft.read().address}",
                            oninput: move |e| draft.write().address = e.value(),
                        }
                    }
                    div { class: "form-actions",
                        button {
                            r#type: "button",
                            class: "btn btn-secondary",
                            onclick: move |_| props.on_close.call(()),
                            "Cancel"
                        }
                        button {
                            r#type: "submit",
                            class: "btn btn-primary",
                            disabled: saving(),
                            if saving() { "Saving..." } else { "Save Profile" }
                        }
                    }
                }
            }
        }
    }
}
