use dioxus::prelude::*;
use shared_types::{mood_label, ConversationAnalysis};
use shared_ui::{Card, CardContent, CardHeader, CardTitle, Skeleton};

const HISTORY_LIMIT: i64 = 10;

/// The caller's recent check-ins, newest first.
#[component]
pub fn AnalysisHistory() -> Element {
    let history =
        use_resource(move || async move { server::api::list_my_analyses(HISTORY_LIMIT).await });

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./analysis_history.css") }
        Card { class: "history",
            CardHeader {
                CardTitle { "Your recent check-ins" }
            }
            CardContent {
                match &*history.read() {
                    None => rsx! {
                        for _ in 0..3 {
                            Skeleton { class: "history-skeleton" }
                        }
                    },
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Could not load check-in history");
                        rsx! { p { class: "history-empty", "History is unavailable right now." } }
                    }
                    Some(Ok(items)) if items.is_empty() => rsx! {
                        p { class: "history-empty", "No assessments yet" }
                    },
                    Some(Ok(items)) => rsx! {
                        ul { class: "history-list",
                            for item in items.iter() {
                                HistoryRow { key: "{item.id}", item: item.clone() }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn HistoryRow(item: ConversationAnalysis) -> Element {
    let date = item.created_at.format("%b %-d, %Y").to_string();
    let label = mood_label(item.mood_score);

    rsx! {
        li { class: "history-row",
            span { class: "history-date", "{date}" }
            span { class: "history-mood", "data-score": "{item.mood_score}", "{item.mood_score}/5 {label}" }
            p { class: "history-summary", "{item.summary}" }
        }
    }
}
