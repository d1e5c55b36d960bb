pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use crate::adapters::{http::HttpModerationClient, terminal::TerminalDisplay};
pub use crate::core::{
    classifier::{ErrorClassifier, Failure},
    health::{HealthMonitor, PollHandle, PollOutcome},
    readiness::{readiness_channel, ReadinessFlag, ReadinessSetter},
    renderer::{Entry, ResultRenderer},
    session::ChatSession,
    submitter::{MessageSubmitter, Rejection, SubmitOutcome},
    transcript::Transcript,
};
pub use utils::error::{ChatError, Result};
