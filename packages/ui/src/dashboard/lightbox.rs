//! Full-screen receipt image viewer with wheel, click and drag zoom.

use dioxus::prelude::*;
use portal_core::lightbox::ZoomPan;

/// Props for Lightbox.
#[derive(Props, Clone, PartialEq)]
pub struct LightboxProps {
    pub title: String,
    /// Image source, usually a data URL.
    pub src: String,
    pub on_close: EventHandler<()>,
}

#[component]
pub fn Lightbox(props: LightboxProps) -> Element {
    let mut zoom = use_signal(ZoomPan::default);
    let on_close = props.on_close;

    let state = zoom();
    let image_style = format!(
        "transform: {}; cursor: {};",
        state.transform_css(),
        state.cursor()
    );

    rsx! {
        div {
            class: "lightbox-backdrop",
            tabindex: "0",
            autofocus: true,
            onclick: move |_| on_close.call(()),
            onkeydown: move |e| {
                if e.key() == Key::Escape {
                    on_close.call(());
                }
            },

            div {
                class: "lightbox-toolbar",
                onclick: move |e| e.stop_propagation(),
                span { class: "lightbox-title", "{props.title}" }
                div { class: "lightbox-controls",
                    button {
                        class: "btn btn-small",
                        title: "Zoom out",
                        onclick: move |_| zoom.write().zoom_out(),
                        "−"
                    }
                    span { class: "lightbox-zoom tabular-nums", "{state.percent()}%" }
                    button {
                        class: "btn btn-small",
                        title: "Zoom in",
                        onclick: move |_| zoom.write().zoom_in(),
                        "+"
                    }
                    button {
                        class: "btn btn-small",
                        onclick: move |_| zoom.write().reset(),
                        "Reset"
                    }
                    button {
                        class: "btn btn-small",
                        title: "Close",
                        onclick: move |_| on_close.call(()),
                        "×"
                    }
                }
            }

            div {
                class: "lightbox-stage",
                onclick: move |e| e.stop_propagation(),
                onwheel: move |e| {
                    e.prevent_default();
                    zoom.write().wheel(e.delta().strip_units().y);
                },
                onmousemove: move |e| {
                    if zoom.peek().is_dragging() {
                        let point = e.client_coordinates();
                        zoom.write().drag_to(point.x, point.y);
                    }
                },
                onmouseup: move |_| zoom.write().end_drag(),
                onmouseleave: move |_| zoom.write().end_drag(),

                img {
                    class: "lightbox-image",
                    src: "{props.src}",
                    alt: "{props.title}",
                    draggable: "false",
                    style: "{image_style}",
                    onmousedown: move |e| {
                        let point = e.client_coordinates();
                        if zoom.write().begin_drag(point.x, point.y) {
                            e.prevent_default();
                        }
                    },
                    onclick: move |e| {
                        e.stop_propagation();
                        zoom.write().click();
                    },
                }
            }
        }
    }
}
