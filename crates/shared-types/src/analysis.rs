use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
#[cfg(feature = "validation")]
use validator::Validate;

use crate::AppError;

/// Prompts the check-in conversation walks through, in order.
pub const CHECK_IN_PROMPTS: &[&str] = &[
    "How have you been sleeping this week?",
    "How manageable has your workload felt lately?",
    "Is anything in particular weighing on you right now?",
    "What is one thing that went well recently?",
];

/// Longest summary stored alongside an analysis.
pub const SUMMARY_MAX_CHARS: usize = 160;

/// One prompt/answer exchange in a check-in conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct ChatTurn {
    #[cfg_attr(
        feature = "validation",
        validate(length(max = 200, message = "Prompts must be at most 200 characters"))
    )]
    pub prompt: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 2000, message = "Answers must be 1-2000 characters"))
    )]
    pub answer: String,
}

/// Submitted at the end of a check-in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct SaveAnalysisRequest {
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))
    )]
    pub mood_score: i16,
    #[cfg_attr(
        feature = "validation",
        validate(
            length(min = 1, max = 4, message = "A check-in has between 1 and 4 answers"),
            nested
        )
    )]
    pub turns: Vec<ChatTurn>,
}

/// A stored assessment ("conversation analysis").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct ConversationAnalysis {
    pub id: Uuid,
    pub user_id: i64,
    pub company_id: Option<Uuid>,
    pub mood_score: i16,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// The stored transcript for a submission: one answer per entry of
/// [`CHECK_IN_PROMPTS`], paired with the canonical prompt text rather than
/// whatever prompt the client sent.
pub fn canonical_transcript(turns: &[ChatTurn]) -> Result<Vec<ChatTurn>, AppError> {
    if turns.len() != CHECK_IN_PROMPTS.len() {
        return Err(AppError::bad_request(format!(
            "Expected {} answers, got {}",
            CHECK_IN_PROMPTS.len(),
            turns.len()
        )));
    }
    Ok(CHECK_IN_PROMPTS
        .iter()
        .zip(turns)
        .map(|(prompt, turn)| ChatTurn {
            prompt: prompt.to_string(),
            answer: turn.answer.clone(),
        })
        .collect())
}

/// Human label for a 1..=5 mood rating.
pub fn mood_label(score: i16) -> &'static str {
    match score {
        i16::MIN..=1 => "Struggling",
        2 => "Low",
        3 => "Okay",
        4 => "Good",
        _ => "Great",
    }
}

/// Short summary stored with an analysis: the mood label followed by the
/// first non-empty answer, cut to [`SUMMARY_MAX_CHARS`].
pub fn summarize(mood_score: i16, turns: &[ChatTurn]) -> String {
    let label = mood_label(mood_score);
    let first = turns
        .iter()
        .map(|t| t.answer.trim())
        .find(|a| !a.is_empty());

    let summary = match first {
        Some(answer) => format!("{label}: {answer}"),
        None => label.to_string(),
    };

    if summary.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = summary.chars().take(SUMMARY_MAX_CHARS - 1).collect();
        format!("{cut}…")
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(answer: &str) -> ChatTurn {
        ChatTurn {
            prompt: CHECK_IN_PROMPTS[0].to_string(),
            answer: answer.to_string(),
        }
    }

    #[test]
    fn canonical_transcript_replaces_client_prompts() {
        let turns: Vec<ChatTurn> = CHECK_IN_PROMPTS
            .iter()
            .map(|_| ChatTurn {
                prompt: "x".repeat(100_000),
                answer: "fine".into(),
            })
            .collect();
        let stored = canonical_transcript(&turns).unwrap();
        assert_eq!(stored.len(), CHECK_IN_PROMPTS.len());
        for (turn, prompt) in stored.iter().zip(CHECK_IN_PROMPTS) {
            assert_eq!(turn.prompt, *prompt);
            assert_eq!(turn.answer, "fine");
        }
    }

    #[test]
    fn canonical_transcript_rejects_wrong_length() {
        let err = canonical_transcript(&[turn("only one")]).unwrap_err();
        assert_eq!(err.kind, crate::AppErrorKind::BadRequest);
        let too_many = vec![turn("a"); CHECK_IN_PROMPTS.len() + 1];
        assert!(canonical_transcript(&too_many).is_err());
    }

    #[test]
    fn mood_labels_cover_scale() {
        assert_eq!(mood_label(1), "Struggling");
        assert_eq!(mood_label(3), "Okay");
        assert_eq!(mood_label(5), "Great");
    }

    #[test]
    fn summary_uses_first_non_empty_answer() {
        let turns = vec![turn("   "), turn("Sleeping badly"), turn("Busy")];
        assert_eq!(summarize(2, &turns), "Low: Sleeping badly");
    }

    #[test]
    fn summary_without_answers_is_label_only() {
        assert_eq!(summarize(4, &[]), "Good");
    }

    #[test]
    fn long_summary_is_truncated() {
        let long = "a".repeat(500);
        let summary = summarize(3, &[turn(&long)]);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(summary.ends_with('…'));
    }
}
