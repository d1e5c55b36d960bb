pub mod classifier;
pub mod health;
pub mod readiness;
pub mod renderer;
pub mod session;
pub mod submitter;
pub mod transcript;

pub use crate::domain::model::{DisplayMessage, FailureRecord, HttpReply, ModerationRequest, ModerationResult};
pub use crate::domain::ports::{ConfigProvider, ModerationService, TranscriptSink};
pub use crate::utils::error::Result;
