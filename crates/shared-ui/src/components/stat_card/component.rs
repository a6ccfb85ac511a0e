use dioxus::prelude::*;

use crate::Card;

/// Card showing a single number with a title and a leading icon.
#[component]
pub fn StatCard(title: String, value: i64, #[props(default)] icon: Element) -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./style.css") }
        Card { class: "stat-card",
            div { class: "stat-card-body",
                div { class: "stat-card-icon", {icon} }
                div {
                    h2 { class: "stat-card-title", "{title}" }
                    p { class: "stat-card-value", "{value}" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_title_and_value() {
        let html = dioxus_ssr::render_element(rsx! {
            StatCard { title: "My Assessments", value: 3 }
        });
        assert!(html.contains("My Assessments"));
        assert!(html.contains("<p class=\"stat-card-value\">3</p>"));
    }

    #[test]
    fn renders_large_counts_verbatim() {
        let html = dioxus_ssr::render_element(rsx! {
            StatCard { title: "Company Assessments", value: 40 }
        });
        assert!(html.contains("stat-card"));
        assert!(html.contains(">40<"));
    }
}
