use dioxus::prelude::*;
use shared_types::{AppError, AuthUser};
use shared_ui::{
    Button, ButtonVariant, Card, CardContent, CardDescription, CardFooter, CardHeader, CardTitle,
    Input,
};
use std::collections::HashMap;

use crate::auth::{use_auth, AuthState};
use crate::routes::Route;

/// Field errors, or a single banner message when the failure is not per-field.
fn split_error(err: &ServerFnError) -> (HashMap<String, String>, Option<String>) {
    let raw = err.to_string();
    let fields = AppError::parse_field_errors(&raw);
    if fields.is_empty() {
        (fields, Some(AppError::friendly_message(&raw)))
    } else {
        (fields, None)
    }
}

/// Shared submit handling: store the user and go home, or surface errors.
fn finish_auth(
    result: Result<AuthUser, ServerFnError>,
    mut auth: AuthState,
    mut field_errors: Signal<HashMap<String, String>>,
    mut error_msg: Signal<Option<String>>,
) {
    match result {
        Ok(user) => {
            auth.set_user(user);
            navigator().push(Route::Home {});
        }
        Err(e) => {
            let (fields, banner) = split_error(&e);
            field_errors.set(fields);
            error_msg.set(banner);
        }
    }
}

#[component]
pub fn LoginForm(on_toggle_auth_state: EventHandler<()>) -> Element {
    let auth = use_auth();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);
        field_errors.set(HashMap::new());

        let result = server::api::login(email(), password()).await;
        finish_auth(result, auth, field_errors, error_msg);
        loading.set(false);
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./auth_forms.css") }
        Card { class: "auth-card",
            CardHeader {
                CardTitle { "Welcome back" }
                CardDescription { "Sign in to continue your check-ins." }
            }
            CardContent {
                if let Some(err) = error_msg() {
                    div { class: "auth-error", role: "alert", "{err}" }
                }
                form { class: "auth-form", onsubmit: handle_login,
                    Input {
                        label: "Email",
                        input_type: "email",
                        autocomplete: "email",
                        placeholder: "you@company.com",
                        value: email(),
                        error: field_errors.read().get("email").cloned(),
                        on_input: move |e: FormEvent| email.set(e.value()),
                    }
                    Input {
                        label: "Password",
                        input_type: "password",
                        autocomplete: "current-password",
                        value: password(),
                        error: field_errors.read().get("password").cloned(),
                        on_input: move |e: FormEvent| password.set(e.value()),
                    }
                    Button {
                        button_type: "submit",
                        class: "auth-submit",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign in" }
                    }
                }
            }
            CardFooter {
                span { "New to Pulsato?" }
                Button {
                    variant: ButtonVariant::Link,
                    onclick: move |_| on_toggle_auth_state.call(()),
                    "Create an account"
                }
            }
        }
    }
}

#[component]
pub fn SignupForm(on_toggle_auth_state: EventHandler<()>) -> Element {
    let auth = use_auth();
    let mut display_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let handle_signup = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);
        field_errors.set(HashMap::new());

        let result = server::api::register(email(), password(), display_name()).await;
        finish_auth(result, auth, field_errors, error_msg);
        loading.set(false);
    };

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./auth_forms.css") }
        Card { class: "auth-card",
            CardHeader {
                CardTitle { "Create your account" }
                CardDescription { "Check-ins take about two minutes." }
            }
            CardContent {
                if let Some(err) = error_msg() {
                    div { class: "auth-error", role: "alert", "{err}" }
                }
                form { class: "auth-form", onsubmit: handle_signup,
                    Input {
                        label: "Display name",
                        autocomplete: "nickname",
                        value: display_name(),
                        error: field_errors.read().get("display_name").cloned(),
                        on_input: move |e: FormEvent| display_name.set(e.value()),
                    }
                    Input {
                        label: "Email",
                        input_type: "email",
                        autocomplete: "email",
                        placeholder: "you@company.com",
                        value: email(),
                        error: field_errors.read().get("email").cloned(),
                        on_input: move |e: FormEvent| email.set(e.value()),
                    }
                    Input {
                        label: "Password",
                        input_type: "password",
                        autocomplete: "new-password",
                        placeholder: "At least 8 characters",
                        value: password(),
                        error: field_errors.read().get("password").cloned(),
                        on_input: move |e: FormEvent| password.set(e.value()),
                    }
                    Button {
                        button_type: "submit",
                        class: "auth-submit",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Sign up" }
                    }
                }
            }
            CardFooter {
                span { "Already have an account?" }
                Button {
                    variant: ButtonVariant::Link,
                    onclick: move |_| on_toggle_auth_state.call(()),
                    "Sign in instead"
                }
            }
        }
    }
}
