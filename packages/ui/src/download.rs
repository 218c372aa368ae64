//! Browser downloads.

use dioxus::prelude::*;

/// Offer `contents` to the browser as a file download.
pub(crate) fn save_text(file_name: &str, mime: &str, contents: &str) {
    let script = format!(
        r#"
        const blob = new Blob([{contents}], {{ type: {mime} }});
        const link = document.createElement("a");
        link.href = URL.createObjectURL(blob);
        link.download = {name};
        link.click();
        URL.revokeObjectURL(link.href);
        "#,
        contents = js_string(contents),
        mime = js_string(mime),
        name = js_string(file_name),
    );
    document::eval(&script);
}

/// Offer a data URL (e.g. a stored receipt image) as a file download.
pub(crate) fn save_data_url(file_name: &str, data_url: &str) {
    let script = format!(
        r#"
        const link = document.createElement("a");
        link.href = {url};
        link.download = {name};
        link.click();
        "#,
        url = js_string(data_url),
        name = js_string(file_name),
    );
    document::eval(&script);
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}
