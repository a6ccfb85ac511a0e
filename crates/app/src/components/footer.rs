use chrono::Datelike;
use dioxus::prelude::*;

#[component]
pub fn Footer() -> Element {
    let year = chrono::Utc::now().year();

    rsx! {
        footer { class: "app-footer",
            span { "Pulsato" }
            span { "\u{00a9} {year}" }
        }
    }
}
