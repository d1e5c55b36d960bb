use crate::domain::model::{DisplayMessage, HttpReply, ModerationRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// HTTP contract of the remote moderation service.
///
/// Implementations report any non-network outcome as an [`HttpReply`], whatever
/// its status code; only failures to obtain a response at all are errors.
#[async_trait]
pub trait ModerationService: Send + Sync {
    async fn fetch_health(&self) -> Result<HttpReply>;
    async fn moderate(&self, request: &ModerationRequest) -> Result<HttpReply>;
}

/// Receives transcript entries as they are appended.
pub trait TranscriptSink: Send + Sync {
    fn present(&self, message: &DisplayMessage);
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn poll_interval(&self) -> Duration;
    fn request_timeout(&self) -> Option<Duration>;
    fn user_agent(&self) -> Option<&str> {
        None
    }
}
