use crate::domain::model::{DisplayBody, DisplayMessage, Tone};
use crate::domain::ports::TranscriptSink;
use std::io::Write;
use std::sync::Mutex;

/// Prints transcript entries to a writer as they arrive.
pub struct TerminalDisplay<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn format_entry(message: &DisplayMessage) -> String {
    let mut lines = Vec::new();
    match &message.body {
        DisplayBody::Text { text } => {
            let marker = if message.is_error { "❌ " } else { "" };
            lines.push(format!("[{}] {}{}", message.label, marker, text));
        }
        DisplayBody::Verdict {
            detected_language,
            translated_text,
            badge,
            confidence,
        } => {
            lines.push(format!("[{}]", message.label));
            if let Some(lang) = detected_language {
                lines.push(format!("  Detected: {}", lang));
                lines.push(format!(
                    "  Translated: {}",
                    translated_text.as_deref().unwrap_or_default()
                ));
            }
            let icon = match badge.tone {
                Tone::Affirmative => "✅",
                Tone::Negative => "🚫",
            };
            lines.push(format!("  Status: {} {}", icon, badge.label));
            lines.push(format!("  Confidence: {}", confidence));
        }
    }
    lines.join("\n")
}

impl<W: Write + Send> TranscriptSink for TerminalDisplay<W> {
    fn present(&self, message: &DisplayMessage) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", format_entry(message)).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write transcript entry: {}", e);
        }
    }
}
