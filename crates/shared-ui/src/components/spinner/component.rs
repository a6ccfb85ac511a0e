use dioxus::prelude::*;

/// Full-height centered spinning ring.
#[component]
pub fn Spinner(#[props(default = "Loading".to_string())] label: String) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        div { class: "spinner-container",
            div {
                class: "spinner",
                role: "status",
                aria_label: "{label}",
            }
        }
    }
}
