use crate::domain::model::{
    Badge, DisplayBody, DisplayMessage, FailureRecord, ModerationResult, Role, Tone, Verdict,
};
use chrono::Utc;

pub const USER_LABEL: &str = "You";
pub const ERROR_LABEL: &str = "Error";
pub const NOTICE_LABEL: &str = "Server";
pub const RESULT_LABEL: &str = "Moderation Result";

/// What is being rendered.
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    User(&'a str),
    Notice(&'a str),
    Error(&'a FailureRecord),
    Result(&'a ModerationResult),
}

/// Maps entries to UI-agnostic display records. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn render(&self, entry: Entry<'_>) -> DisplayMessage {
        let (role, is_error, label, body) = match entry {
            Entry::User(text) => (Role::User, false, USER_LABEL, text_body(text)),
            Entry::Notice(text) => (Role::System, false, NOTICE_LABEL, text_body(text)),
            Entry::Error(failure) => (Role::System, true, ERROR_LABEL, text_body(&failure.message)),
            Entry::Result(result) => (Role::System, false, RESULT_LABEL, verdict_body(result)),
        };

        DisplayMessage {
            role,
            is_error,
            label: label.to_string(),
            body,
            created_at: Utc::now(),
        }
    }
}

fn text_body(text: &str) -> DisplayBody {
    DisplayBody::Text {
        text: text.to_string(),
    }
}

fn verdict_body(result: &ModerationResult) -> DisplayBody {
    let (detected_language, translated_text) = match result.foreign_language() {
        Some(lang) => (
            Some(lang.to_uppercase()),
            Some(result.translated_text.clone().unwrap_or_default()),
        ),
        None => (None, None),
    };

    DisplayBody::Verdict {
        detected_language,
        translated_text,
        badge: badge_for(result.status),
        confidence: format_confidence(result.score),
    }
}

pub fn badge_for(verdict: Verdict) -> Badge {
    match verdict {
        Verdict::Clean => Badge {
            label: "Clean".to_string(),
            tone: Tone::Affirmative,
        },
        Verdict::Inappropriate => Badge {
            label: "Inappropriate".to_string(),
            tone: Tone::Negative,
        },
    }
}

/// `score * 100` with exactly two decimals, e.g. 0.973 -> "97.30%".
pub fn format_confidence(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}
