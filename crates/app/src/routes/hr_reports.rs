use dioxus::prelude::*;
use shared_types::{mood_label, AppError, AppErrorKind};
use shared_ui::{Card, CardContent, CardDescription, CardHeader, CardTitle, Spinner};

use crate::routes::Route;

const REPORT_LIMIT: i64 = 50;

fn is_unauthorized(err: &ServerFnError) -> bool {
    AppError::from_server_error(&err.to_string())
        .is_some_and(|e| e.kind == AppErrorKind::Unauthorized)
}

/// Company-wide check-ins for HR and admins. The server enforces the role.
#[component]
pub fn HrReports() -> Element {
    let reports =
        use_resource(move || async move { server::api::list_company_analyses(REPORT_LIMIT).await });

    use_effect(move || {
        if let Some(Err(e)) = &*reports.read() {
            if is_unauthorized(e) {
                navigator().push(Route::AuthPage {});
            }
        }
    });

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./hr_reports.css") }
        Card { class: "hr-reports",
            CardHeader {
                CardTitle { "Company check-ins" }
                CardDescription { "The latest {REPORT_LIMIT} check-ins across your company." }
            }
            CardContent {
                match &*reports.read() {
                    None => rsx! { Spinner { label: "Loading reports" } },
                    Some(Err(e)) => {
                        let err = AppError::from_server_error(&e.to_string());
                        match err.as_ref().map(|e| &e.kind) {
                            Some(AppErrorKind::Unauthorized) => rsx! {},
                            Some(AppErrorKind::Forbidden) => rsx! {
                                p { class: "hr-reports-denied", "Reports are available to HR and company admins." }
                            },
                            _ => {
                                tracing::error!(error = %e, "Could not load company reports");
                                rsx! { p { class: "hr-reports-denied", "Reports are unavailable right now." } }
                            }
                        }
                    }
                    Some(Ok(items)) if items.is_empty() => rsx! {
                        p { class: "hr-reports-empty", "No check-ins recorded yet." }
                    },
                    Some(Ok(items)) => rsx! {
                        table { class: "hr-reports-table",
                            thead {
                                tr {
                                    th { "Date" }
                                    th { "Mood" }
                                    th { "Summary" }
                                }
                            }
                            tbody {
                                for item in items.iter() {
                                    tr { key: "{item.id}",
                                        td { "{item.created_at.format(\"%Y-%m-%d\")}" }
                                        td { "{item.mood_score} {mood_label(item.mood_score)}" }
                                        td { "{item.summary}" }
                                    }
                                }
                            }
                        }
                    },
                }
                Link { to: Route::Home {}, class: "hr-reports-back", "Back to dashboard" }
            }
        }
    }
}
