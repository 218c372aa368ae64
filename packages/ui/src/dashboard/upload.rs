//! Receipt image upload and the processing overlay.

use dioxus::prelude::*;
use portal_core::{MAX_IMAGE_BYTES, MAX_UPLOAD_IMAGES, UploadImage, UploadOutcome};

use crate::auth::session_token;
use crate::{use_session, use_toasts};

const FILE_INPUT_ID: &str = "receipt-file-input";

/// Props for UploadButton.
#[derive(Props, Clone, PartialEq)]
pub struct UploadButtonProps {
    /// Whether the employee has a complete profile. Without one the button
    /// asks for a profile instead of opening the file picker.
    pub profile_ready: bool,
    pub on_profile_needed: EventHandler<()>,
    /// Called with a status message while images are read and recognized.
    pub on_progress: EventHandler<Option<String>>,
    pub on_uploaded: EventHandler<UploadOutcome>,
}

#[component]
pub fn UploadButton(props: UploadButtonProps) -> Element {
    let session = use_session();
    let toasts = use_toasts();
    let on_progress = props.on_progress;
    let on_uploaded = props.on_uploaded;

    let on_files = move |e: FormEvent| async move {
        let files = e.files();
        if files.is_empty() {
            return;
        }
        if files.len() > MAX_UPLOAD_IMAGES {
            toasts.error(format!("Select at most {} images at a time", MAX_UPLOAD_IMAGES));
            return;
        }

        on_progress.call(Some(format!("Reading {} image(s)...", files.len())));
        let mut images = Vec::with_capacity(files.len());
        for file in files {
            let name = file.name();
            let content_type = file
                .content_type()
                .unwrap_or_else(|| "application/octet-stream".to_string());
            if !content_type.starts_with("image/") {
                toasts.error(format!("{} is not an image", name));
                continue;
            }
            match file.read_bytes().await {
                Ok(bytes) if bytes.len() > MAX_IMAGE_BYTES => {
                    toasts.error(format!("{} is larger than 10 MB", name));
                }
                Ok(bytes) => images.push(UploadImage::from_bytes(name, content_type, &bytes)),
                Err(err) => toasts.error(format!("Could not read {}: {}", name, err)),
            }
        }

        if images.is_empty() {
            on_progress.call(None);
            return;
        }

        on_progress.call(Some(format!("Extracting {} receipt(s)...", images.len())));
        match api::upload_receipts(session_token(&session), images).await {
            Ok(outcome) => {
                if outcome.created.is_empty() {
                    toasts.info(outcome.summary());
                } else {
                    toasts.success(outcome.summary());
                }
                on_uploaded.call(outcome);
            }
            Err(err) => toasts.error(format!("Upload failed: {}", err)),
        }
        on_progress.call(None);
    };

    rsx! {
        if props.profile_ready {
            label { class: "btn btn-primary", r#for: FILE_INPUT_ID, "Upload Receipts" }
            input {
                id: FILE_INPUT_ID,
                class: "visually-hidden",
                r#type: "file",
                accept: "image/*",
                multiple: true,
                onchange: on_files,
            }
        } else {
            button {
                class: "btn btn-primary",
                onclick: move |_| props.on_profile_needed.call(()),
                "Upload Receipts"
            }
        }
    }
}

/// Blocking overlay shown while an upload is processed.
#[component]
pub fn ProcessingOverlay(message: String) -> Element {
    rsx! {
        div { class: "processing-overlay",
            div { class: "processing-card",
                div { class: "spinner" }
                p { "{message}" }
            }
        }
    }
}
