use dioxus::prelude::*;
use shared_types::AuthMode;

use crate::components::{Footer, LoginForm, SignupForm};

/// Sign-in / sign-up page. Holds only the mode; the forms own their fields
/// and requests.
#[component]
pub fn AuthPage() -> Element {
    let mut auth_mode = use_signal(AuthMode::default);

    let toggle_auth_state = move |_: ()| auth_mode.with_mut(|mode| mode.toggle());

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./auth_page.css") }

        div { class: "auth-page",
            div { class: "auth-hero",
                h1 { "Pulsato" }
                p { "A two-minute check-in on how you are really doing." }
            }
            div { class: "auth-panel", "data-mode": auth_mode().as_str(),
                match auth_mode() {
                    AuthMode::Login => rsx! { LoginForm { on_toggle_auth_state: toggle_auth_state } },
                    AuthMode::Signup => rsx! { SignupForm { on_toggle_auth_state: toggle_auth_state } },
                }
            }
            Footer {}
        }
    }
}
