pub mod auth_page;
pub mod home;
pub mod hr_reports;
pub mod not_found;

use crate::auth::use_auth;
use crate::components::Footer;
use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdHeartPulse, LdLogOut};
use dioxus_free_icons::Icon;
use shared_ui::{Button, ButtonSize, ButtonVariant};

use auth_page::AuthPage;
use home::Home;
use hr_reports::HrReports;
use not_found::NotFound;

/// Application routes.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[route("/auth")]
    AuthPage {},
    #[layout(AppLayout)]
    #[route("/")]
    Home {},
    #[route("/hr-reports")]
    HrReports {},
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Header with sign-out, page outlet, footer.
#[component]
fn AppLayout() -> Element {
    let mut auth = use_auth();
    let mut signing_out = use_signal(|| false);

    let handle_sign_out = move |_| async move {
        signing_out.set(true);
        if let Err(e) = server::api::logout().await {
            tracing::error!(error = %e, "Sign out request failed");
        }
        auth.clear_auth();
        signing_out.set(false);
        navigator().push(Route::AuthPage {});
    };

    let greeting = auth
        .current_user
        .read()
        .as_ref()
        .map(|u| u.display_name.clone());

    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                Link { to: Route::Home {}, class: "app-brand",
                    Icon::<LdHeartPulse> { icon: LdHeartPulse, width: 22, height: 22 }
                    span { "Pulsato" }
                }
                div { class: "app-header-actions",
                    if let Some(name) = greeting {
                        span { class: "app-greeting", "Hi, {name}" }
                    }
                    Button {
                        variant: ButtonVariant::Ghost,
                        size: ButtonSize::Small,
                        disabled: signing_out(),
                        onclick: handle_sign_out,
                        Icon::<LdLogOut> { icon: LdLogOut, width: 16, height: 16 }
                        "Sign out"
                    }
                }
            }
            main { class: "app-main",
                Outlet::<Route> {}
            }
            Footer {}
        }
    }
}
