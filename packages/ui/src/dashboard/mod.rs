//! Employee dashboard: the receipt ledger and everything around it.

mod confirm_dialog;
mod edit_dialog;
mod filter_bar;
mod ledger_table;
mod lightbox;
mod upload;

pub use confirm_dialog::ConfirmDialog;
pub use edit_dialog::EditDialog;
pub use filter_bar::FilterBar;
pub use ledger_table::LedgerTable;
pub use lightbox::Lightbox;
pub use upload::{ProcessingOverlay, UploadButton};

use dioxus::prelude::*;
use portal_core::ledger::{distinct_categories, distinct_statuses, export_file_name, export_json};
use portal_core::{
    ExpenseReceipt, Folder, LedgerFilter, LedgerQuery, LedgerView, Profile, ReceiptId, Selection,
    SortState,
};

use crate::auth::session_token;
use crate::download::{save_data_url, save_text};
use crate::timer::sleep_ms;
use crate::{ProfilePanel, SignOutButton, use_session, use_toasts};

/// Delay between the last keystroke and applying the search text.
const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Image shown in the lightbox.
#[derive(Debug, Clone, PartialEq)]
struct OpenImage {
    title: String,
    src: String,
}

/// Route path of a ledger folder tab.
pub fn folder_path(folder: Folder) -> String {
    match folder {
        Folder::All => "/dashboard".to_string(),
        other => format!("/dashboard/{}", other.slug()),
    }
}

/// Props for Dashboard.
#[derive(Props, Clone, PartialEq)]
pub struct DashboardProps {
    /// Folder slug from the URL; unknown slugs show every receipt.
    #[props(default)]
    pub folder: String,
}

/// Employee dashboard page.
#[component]
pub fn Dashboard(props: DashboardProps) -> Element {
    let session = use_session();
    let toasts = use_toasts();
    let nav = use_navigator();

    let folder = Folder::from_slug(&props.folder);

    let mut receipts = use_signal(Vec::<ExpenseReceipt>::new);
    let mut profile = use_signal(|| None::<Profile>);
    let mut loading = use_signal(|| true);

    let mut search_text = use_signal(String::new);
    let mut search_generation = use_signal(|| 0u64);
    let mut filter = use_signal(LedgerFilter::default);
    let mut show_advanced = use_signal(|| false);
    let mut sort = use_signal(SortState::default);
    let mut selection = use_signal(Selection::default);

    let mut editing = use_signal(|| None::<ExpenseReceipt>);
    let mut deleting = use_signal(|| None::<ExpenseReceipt>);
    let mut delete_busy = use_signal(|| false);
    let mut processing = use_signal(|| None::<String>);
    let mut open_image = use_signal(|| None::<OpenImage>);
    let mut profile_panel = use_signal(|| None::<Option<String>>);

    // Signed-out visitors go back to the landing page
    use_effect(move || {
        if session.read().is_none() {
            nav.replace("/");
        }
    });

    let reload = move || {
        spawn(async move {
            let token = session_token(&session);
            match api::list_receipts(token, None).await {
                Ok(list) => {
                    selection.write().retain_existing(&list);
                    receipts.set(list);
                }
                Err(e) => toasts.error(format!("Failed to load receipts: {}", e)),
            }
            loading.set(false);
        });
    };

    let _initial_load = use_resource(move || async move {
        let Some(current) = session.read().clone() else {
            return;
        };
        match api::get_profile(current.account_id.to_string(), current.token.clone()).await {
            Ok(p) => profile.set(p),
            Err(e) => tracing::warn!("Failed to load profile: {}", e),
        }
        reload();
    });

    let view = LedgerView::build(
        &receipts.read(),
        &LedgerQuery {
            filter: filter(),
            folder,
            sort: sort(),
        },
    );
    let statuses = distinct_statuses(&receipts.read());
    let categories = distinct_categories(&receipts.read());
    let selected_count = selection.read().selected_in_view(&view);
    let profile_ready = profile.read().as_ref().is_some_and(Profile::is_complete);
    let greeting = profile
        .read()
        .as_ref()
        .map(|p| p.name.clone())
        .or_else(|| session.read().as_ref().map(|s| s.display_name.clone()))
        .unwrap_or_default();

    let on_search = move |text: String| {
        search_text.set(text.clone());
        let generation = search_generation() + 1;
        search_generation.set(generation);
        spawn(async move {
            sleep_ms(SEARCH_DEBOUNCE_MS).await;
            if search_generation() == generation {
                filter.write().search = text;
            }
        });
    };

    let on_reset = move |_| {
        search_generation.set(search_generation() + 1);
        search_text.set(String::new());
        filter.set(LedgerFilter::default());
    };

    let view_for_export = view.clone();
    let on_export = move |_| {
        match export_json(&view_for_export, &selection.read()) {
            Ok(json) => {
                save_text(&export_file_name(folder), "application/json", &json);
                toasts.success(format!("Exported {} receipt(s)", selected_count));
            }
            Err(e) => toasts.error(format!("Export failed: {}", e)),
        }
    };

    let view_for_toggle_all = view.clone();
    let on_toggle_all = move |_| selection.write().toggle_all(&view_for_toggle_all);

    let on_open = move |receipt: ExpenseReceipt| {
        let token = session_token(&session);
        spawn(async move {
            match api::receipt_image(receipt.id.to_string(), token).await {
                Ok(Some(src)) => open_image.set(Some(OpenImage {
                    title: format!("{} · {}", receipt.receipt_no, receipt.amount_label()),
                    src,
                })),
                Ok(None) => toasts.info("This receipt has no stored image"),
                Err(e) => toasts.error(format!("Could not load image: {}", e)),
            }
        });
    };

    let on_download = move |receipt: ExpenseReceipt| {
        let token = session_token(&session);
        spawn(async move {
            let image = match receipt.image_file_name() {
                Some(_) => api::receipt_image(receipt.id.to_string(), token).await,
                None => Ok(None),
            };
            match image {
                Ok(Some(src)) => {
                    let name = receipt
                        .image_file_name()
                        .unwrap_or_else(|| receipt.metadata_file_name());
                    save_data_url(&name, &src);
                }
                Ok(None) => {
                    let metadata = portal_core::ReceiptMetadata::from(&receipt);
                    match serde_json::to_string_pretty(&metadata) {
                        Ok(json) => save_text(&receipt.metadata_file_name(), "application/json", &json),
                        Err(e) => toasts.error(format!("Download failed: {}", e)),
                    }
                }
                Err(e) => toasts.error(format!("Download failed: {}", e)),
            }
        });
    };

    let on_submit_receipt = move |receipt: ExpenseReceipt| {
        let token = session_token(&session);
        spawn(async move {
            match api::submit_receipt(receipt.id.to_string(), token).await {
                Ok(updated) => {
                    toasts.success(format!("Receipt {} submitted for review", updated.receipt_no));
                    reload();
                }
                Err(e) => toasts.error(format!("Could not submit receipt: {}", e)),
            }
        });
    };

    let on_confirm_delete = move |_| {
        let Some(receipt) = deleting() else {
            return;
        };
        let token = session_token(&session);
        spawn(async move {
            delete_busy.set(true);
            match api::delete_receipt(receipt.id.to_string(), token).await {
                Ok(()) => {
                    toasts.success(format!("Receipt {} deleted", receipt.receipt_no));
                    selection.write().remove(&receipt.id);
                    reload();
                }
                Err(e) => toasts.error(format!("Could not delete receipt: {}", e)),
            }
            delete_busy.set(false);
            deleting.set(None);
        });
    };

    rsx! {
        div { class: "page-container dashboard",
            div { class: "page-header",
                div { class: "page-header-content",
                    h1 { class: "page-title", "Hello, {greeting}" }
                    p { class: "page-description", "Your expense receipts" }
                }
                div { class: "page-header-actions",
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| profile_panel.set(Some(None)),
                        if profile.read().is_some() { "Profile" } else { "Create Profile" }
                    }
                    button {
                        class: "btn btn-secondary",
                        disabled: selected_count == 0,
                        onclick: on_export,
                        "Export ({selected_count})"
                    }
                    UploadButton {
                        profile_ready,
                        on_profile_needed: move |_| {
                            profile_panel.set(Some(Some(
                                "Please complete your profile before uploading receipts.".to_string(),
                            )));
                        },
                        on_progress: move |message| processing.set(message),
                        on_uploaded: move |_| reload(),
                    }
                    SignOutButton {}
                }
            }

            FilterBar {
                search: search_text(),
                filter: filter(),
                statuses,
                categories,
                show_advanced: show_advanced(),
                on_search,
                on_change: move |next| filter.set(next),
                on_toggle_advanced: move |_| show_advanced.toggle(),
                on_reset,
            }

            nav { class: "folder-tabs",
                for tab in Folder::ALL {
                    {
                        let class = if tab == folder { "folder-tab active" } else { "folder-tab" };
                        let count = view.counts.get(tab);

                        rsx! {
                            Link { to: folder_path(tab), class: class,
                                "{tab.label()}"
                                span { class: "folder-count", "{count}" }
                            }
                        }
                    }
                }
            }

            div { class: "result-count",
                "{view.len()} receipt(s)"
                if selection.read().len() > 0 {
                    span { class: "text-muted", " · {selection.read().len()} selected" }
                }
            }

            if loading() {
                div { class: "loading", "Loading receipts..." }
            } else if view.is_empty() {
                div { class: "empty-state",
                    p { "No receipts to show" }
                    if filter.read().is_active() {
                        p { class: "hint", "Try clearing the filters" }
                    } else {
                        p { class: "hint", "Upload receipt images to get started" }
                    }
                }
            } else {
                LedgerTable {
                    view: view.clone(),
                    sort: sort(),
                    selection: selection(),
                    on_sort: move |key| sort.set(sort().click(key)),
                    on_toggle: move |id: ReceiptId| selection.write().toggle(id),
                    on_toggle_all,
                    on_open,
                    on_download,
                    on_edit: move |receipt| editing.set(Some(receipt)),
                    on_delete: move |receipt| deleting.set(Some(receipt)),
                    on_submit: on_submit_receipt,
                }
            }

            if let Some(receipt) = editing() {
                EditDialog {
                    receipt,
                    on_saved: move |_| {
                        editing.set(None);
                        reload();
                    },
                    on_close: move |_| editing.set(None),
                }
            }

            if let Some(receipt) = deleting() {
                ConfirmDialog {
                    title: "Delete receipt?",
                    message: format!(
                        "Receipt {} ({}) and its image will be permanently removed.",
                        receipt.receipt_no,
                        receipt.amount_label()
                    ),
                    confirm_label: "Delete",
                    busy: delete_busy(),
                    on_confirm: on_confirm_delete,
                    on_cancel: move |_| deleting.set(None),
                }
            }

            if let Some(notice) = profile_panel() {
                ProfilePanel {
                    profile: profile(),
                    notice,
                    on_saved: move |saved| {
                        profile.set(Some(saved));
                        profile_panel.set(None);
                    },
                    on_close: move |_| profile_panel.set(None),
                }
            }

            if let Some(image) = open_image() {
                Lightbox {
                    title: image.title,
                    src: image.src,
                    on_close: move |_| open_image.set(None),
                }
            }

            if let Some(message) = processing() {
                ProcessingOverlay { message }
            }
        }
    }
}
