use dioxus::prelude::*;
use shared_types::{mood_label, AppError, ChatTurn, SaveAnalysisRequest, CHECK_IN_PROMPTS};
use shared_ui::{
    Button, ButtonVariant, Card, CardContent, CardFooter, CardHeader, CardTitle, Textarea,
};

/// Progress through the scripted check-in.
#[derive(Debug, Clone, PartialEq, Default)]
struct CheckIn {
    answers: Vec<String>,
    mood: Option<i16>,
}

impl CheckIn {
    /// Prompt awaiting an answer, or `None` once every prompt is answered.
    fn current_prompt(&self) -> Option<&'static str> {
        CHECK_IN_PROMPTS.get(self.answers.len()).copied()
    }

    /// Record an answer to the current prompt. Blank answers are refused.
    fn answer(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.current_prompt().is_none() {
            return false;
        }
        self.answers.push(text.to_string());
        true
    }

    fn transcript(&self) -> Vec<ChatTurn> {
        CHECK_IN_PROMPTS
            .iter()
            .zip(&self.answers)
            .map(|(prompt, answer)| ChatTurn {
                prompt: prompt.to_string(),
                answer: answer.clone(),
            })
            .collect()
    }

    /// Request ready to submit once all prompts and the mood are in.
    fn request(&self) -> Option<SaveAnalysisRequest> {
        if self.current_prompt().is_some() {
            return None;
        }
        Some(SaveAnalysisRequest {
            mood_score: self.mood?,
            turns: self.transcript(),
        })
    }
}

/// Scripted check-in conversation. Calls `on_complete` after a successful
/// save or when cancelled.
#[component]
pub fn ChatInterface(on_complete: EventHandler<()>) -> Element {
    let mut check_in = use_signal(CheckIn::default);
    let mut draft = use_signal(String::new);
    let mut submitting = use_signal(|| false);
    let mut error_msg = use_signal(|| Option::<String>::None);

    let send_answer = move |evt: FormEvent| {
        evt.prevent_default();
        if check_in.write().answer(&draft()) {
            draft.set(String::new());
        }
    };

    let submit = move |_| async move {
        let Some(req) = check_in.read().request() else {
            return;
        };
        submitting.set(true);
        error_msg.set(None);
        match server::api::save_conversation_analysis(req).await {
            Ok(_) => on_complete.call(()),
            Err(e) => {
                tracing::error!(error = %e, "Saving check-in failed");
                error_msg.set(Some(AppError::friendly_message(&e.to_string())));
            }
        }
        submitting.set(false);
    };

    let progress = check_in.read().answers.len();
    let total = CHECK_IN_PROMPTS.len();
    let transcript = check_in.read().transcript();
    let prompt = check_in.read().current_prompt();
    let mood = check_in.read().mood;

    rsx! {
        document::Link { rel: "stylesheet", href: asset!("./chat_interface.css") }
        Card { class: "chat",
            CardHeader {
                CardTitle { "Check-in" }
                span { class: "chat-progress", "{progress} / {total}" }
            }
            CardContent {
                ol { class: "chat-log",
                    for turn in transcript {
                        li { class: "chat-bubble chat-bubble-prompt", "{turn.prompt}" }
                        li { class: "chat-bubble chat-bubble-answer", "{turn.answer}" }
                    }
                    if let Some(prompt) = prompt {
                        li { class: "chat-bubble chat-bubble-prompt", "{prompt}" }
                    }
                }

                if prompt.is_some() {
                    form { class: "chat-reply", onsubmit: send_answer,
                        Textarea {
                            rows: 3,
                            placeholder: "Type your answer",
                            value: draft(),
                            on_input: move |e: FormEvent| draft.set(e.value()),
                        }
                        Button { button_type: "submit", disabled: draft().trim().is_empty(), "Send" }
                    }
                } else {
                    div { class: "chat-mood",
                        p { "Overall, how would you rate your week?" }
                        div { class: "chat-mood-scale", role: "radiogroup",
                            for score in 1..=5i16 {
                                button {
                                    r#type: "button",
                                    class: "chat-mood-option",
                                    role: "radio",
                                    aria_checked: if mood == Some(score) { "true" } else { "false" },
                                    onclick: move |_| check_in.write().mood = Some(score),
                                    span { class: "chat-mood-score", "{score}" }
                                    span { class: "chat-mood-label", "{mood_label(score)}" }
                                }
                            }
                        }
                    }
                }

                if let Some(err) = error_msg() {
                    p { class: "chat-error", role: "alert", "{err}" }
                }
            }
            CardFooter {
                Button {
                    variant: ButtonVariant::Ghost,
                    disabled: submitting(),
                    onclick: move |_| on_complete.call(()),
                    "Cancel"
                }
                Button {
                    disabled: submitting() || check_in.read().request().is_none(),
                    onclick: submit,
                    if submitting() { "Saving..." } else { "Finish check-in" }
                }
            }
        }
    }
}
