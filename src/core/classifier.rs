use crate::domain::model::FailureRecord;
use serde_json::Value;

pub const UNEXPECTED_RESPONSE: &str = "Unexpected server response";

/// Every way a request to the moderation service can fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// No response came back from the network layer.
    Connectivity { message: String },
    /// A response arrived with a non-success status.
    Protocol { status: u16, body: Option<Value> },
    /// A success status whose body does not carry a verdict.
    MalformedResponse,
}

impl Failure {
    pub fn kind(&self) -> &'static str {
        match self {
            Failure::Connectivity { .. } => "connectivity",
            Failure::Protocol { .. } => "protocol",
            Failure::MalformedResponse => "malformed_response",
        }
    }
}

/// Turns any [`Failure`] into a message fit for the transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn classify(&self, failure: &Failure) -> FailureRecord {
        let message = match failure {
            Failure::Connectivity { message } if !message.is_empty() => message.clone(),
            Failure::Connectivity { .. } => UNEXPECTED_RESPONSE.to_string(),
            Failure::Protocol { body, .. } => body
                .as_ref()
                .and_then(error_field)
                .unwrap_or_else(|| UNEXPECTED_RESPONSE.to_string()),
            Failure::MalformedResponse => UNEXPECTED_RESPONSE.to_string(),
        };
        FailureRecord { message }
    }
}

/// Whether a JSON value counts as present: `null`, `false`, `0` and `""` do not.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First present of `error` then `detail`. Structured values (e.g. a list of
/// validation problems) are shown as JSON.
fn error_field(body: &Value) -> Option<String> {
    ["error", "detail"]
        .iter()
        .filter_map(|key| body.get(key))
        .find(|value| is_truthy(value))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}
