use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Readiness as reported by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Ready,
    /// Any status other than `"ready"`, kept verbatim for logging.
    Loading(String),
}

impl HealthStatus {
    pub fn from_status(status: &str) -> Self {
        if status == "ready" {
            HealthStatus::Ready
        } else {
            HealthStatus::Loading(status.to_string())
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, HealthStatus::Ready)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub text: String,
}

impl ModerationRequest {
    /// Returns `None` when the text is empty after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                text: trimmed.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Clean,
    Inappropriate,
}

impl Verdict {
    /// Only `"clean"` is affirmative; every other status is treated as a flag.
    pub fn from_status(status: &str) -> Self {
        if status == "clean" {
            Verdict::Clean
        } else {
            Verdict::Inappropriate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResult {
    pub status: Verdict,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
}

impl ModerationResult {
    /// The language code when the text was not English and a translation applies.
    pub fn foreign_language(&self) -> Option<&str> {
        self.source_language
            .as_deref()
            .filter(|lang| !lang.is_empty() && *lang != "en")
    }
}

/// Raw reply from the remote service. `body` is `None` when it was not valid JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Affirmative,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub label: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayBody {
    Text {
        text: String,
    },
    Verdict {
        detected_language: Option<String>,
        translated_text: Option<String>,
        badge: Badge,
        confidence: String,
    },
}

/// One transcript entry. Entries are never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMessage {
    pub role: Role,
    pub is_error: bool,
    pub label: String,
    pub body: DisplayBody,
    pub created_at: DateTime<Utc>,
}

impl DisplayMessage {
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            DisplayBody::Text { text } => Some(text),
            DisplayBody::Verdict { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_and_rejects_blank() {
        assert_eq!(ModerationRequest::new("  hi  ").unwrap().text, "hi");
        assert!(ModerationRequest::new("").is_none());
        assert!(ModerationRequest::new(" \t\n").is_none());
    }

    #[test]
    fn test_foreign_language_excludes_english_and_empty() {
        let mut result = ModerationResult {
            status: Verdict::Clean,
            score: 0.5,
            source_language: Some("en".to_string()),
            translated_text: Some("hello".to_string()),
        };
        assert_eq!(result.foreign_language(), None);

        result.source_language = Some(String::new());
        assert_eq!(result.foreign_language(), None);

        result.source_language = Some("es".to_string());
        assert_eq!(result.foreign_language(), Some("es"));
    }

    #[test]
    fn test_health_status_only_ready_is_ready() {
        assert!(HealthStatus::from_status("ready").is_ready());
        assert!(!HealthStatus::from_status("loading").is_ready());
        assert!(!HealthStatus::from_status("READY").is_ready());
    }
}
