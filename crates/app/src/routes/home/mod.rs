pub mod pipeline;
pub mod view;

use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdBuilding2, LdClipboardList, LdMessageCircle};
use dioxus_free_icons::Icon;
use shared_ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardDescription, CardHeader, CardTitle,
    Spinner, StatCard,
};
use std::cell::Cell;
use std::rc::Rc;

use crate::auth::{use_auth, AuthState};
use crate::components::{AnalysisHistory, ChatInterface};
use crate::routes::Route;
use pipeline::{resolve_dashboard, DashboardSink, DashboardUpdate, LiveSink, ServerBackend};
use view::{dashboard_view, DashboardState, DashboardView, MainPanel};

/// Writes pipeline results into component state.
struct MountedSink {
    state: Signal<DashboardState>,
    auth: AuthState,
    nav: Navigator,
}

impl DashboardSink for MountedSink {
    fn apply(&mut self, update: DashboardUpdate) {
        match update {
            DashboardUpdate::RedirectToAuth => {
                self.nav.push(Route::AuthPage {});
            }
            DashboardUpdate::Identity(user) => self.auth.set_user(user),
            other => self.state.write().apply(&other),
        }
    }
}

#[component]
pub fn Home() -> Element {
    let mut state = use_signal(DashboardState::default);
    let auth = use_auth();
    let nav = navigator();

    let alive = use_hook(|| Rc::new(Cell::new(true)));
    use_drop({
        let alive = alive.clone();
        move || alive.set(false)
    });

    // Once per mount.
    use_hook(move || {
        let mut sink = LiveSink::new(alive.clone(), MountedSink { state, auth, nav });
        spawn(async move {
            resolve_dashboard(&ServerBackend, &mut sink).await;
        })
    });

    let view = dashboard_view(&state.read());

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./home.css") }

        match view {
            DashboardView::Loading => rsx! {
                div { class: "home-loading",
                    Spinner { label: "Loading your dashboard" }
                }
            },
            DashboardView::Ready { main, show_history, show_hr_tools, company_count, personal_count } => rsx! {
                div { class: "home",
                    section { class: "home-main",
                        match main {
                            MainPanel::CallToAction => rsx! {
                                Card { class: "home-cta",
                                    CardHeader {
                                        CardTitle { "How are you, really?" }
                                        CardDescription {
                                            "Take a short check-in. Your answers stay yours; your company only sees totals."
                                        }
                                    }
                                    CardContent {
                                        Button {
                                            size: ButtonSize::Large,
                                            onclick: move |_| state.write().start_assessment(),
                                            Icon::<LdMessageCircle> { icon: LdMessageCircle, width: 18, height: 18 }
                                            "Start Assessment"
                                        }
                                    }
                                }
                            },
                            MainPanel::Assessment => rsx! {
                                ChatInterface { on_complete: move |_| state.write().finish_assessment() }
                            },
                        }
                        if show_history {
                            AnalysisHistory {}
                        }
                    }
                    aside { class: "home-side",
                        if show_hr_tools {
                            Card { class: "home-hr-tools",
                                CardHeader {
                                    CardTitle { "HR tools" }
                                    CardDescription { "Recent check-ins across your company." }
                                }
                                CardContent {
                                    Button {
                                        variant: ButtonVariant::Secondary,
                                        onclick: move |_| { nav.push(Route::HrReports {}); },
                                        Icon::<LdClipboardList> { icon: LdClipboardList, width: 16, height: 16 }
                                        "Open reports"
                                    }
                                }
                            }
                        }
                        if let Some(count) = company_count {
                            StatCard {
                                title: "Company check-ins",
                                value: count,
                                icon: rsx! { Icon::<LdBuilding2> { icon: LdBuilding2, width: 20, height: 20 } },
                            }
                        }
                        if let Some(count) = personal_count {
                            StatCard {
                                title: "Your check-ins",
                                value: count,
                                icon: rsx! { Icon::<LdMessageCircle> { icon: LdMessageCircle, width: 20, height: 20 } },
                            }
                        }
                    }
                }
            },
        }
    }
}
