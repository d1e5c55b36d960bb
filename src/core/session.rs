use crate::core::health::{HealthMonitor, PollHandle, DEFAULT_POLL_INTERVAL};
use crate::core::readiness::{readiness_channel, ReadinessFlag};
use crate::core::submitter::{MessageSubmitter, SubmitOutcome, UiState};
use crate::core::transcript::Transcript;
use crate::domain::model::DisplayMessage;
use crate::domain::ports::ModerationService;
use crate::utils::error::{ChatError, Result};
use std::sync::Arc;
use std::time::Duration;

/// A chat against one moderation server: health polling, submissions and the
/// shared transcript.
pub struct ChatSession {
    submitter: MessageSubmitter,
    readiness: ReadinessFlag,
    transcript: Transcript,
    monitor: Option<HealthMonitor>,
    poller: Option<PollHandle>,
}

impl ChatSession {
    pub fn new(service: Arc<dyn ModerationService>, transcript: Transcript) -> Self {
        Self::with_poll_interval(service, transcript, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        service: Arc<dyn ModerationService>,
        transcript: Transcript,
        interval: Duration,
    ) -> Self {
        let (setter, readiness) = readiness_channel();
        let monitor = HealthMonitor::new(service.clone(), setter, transcript.clone())
            .with_interval(interval);
        let submitter = MessageSubmitter::new(service, readiness.clone(), transcript.clone());

        Self {
            submitter,
            readiness,
            transcript,
            monitor: Some(monitor),
            poller: None,
        }
    }

    /// Starts health polling. Calling it again is a no-op.
    pub fn start(&mut self) {
        if let Some(monitor) = self.monitor.take() {
            tracing::debug!("Starting health poller");
            self.poller = Some(monitor.spawn());
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|poller| !poller.is_finished())
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_ready()
    }

    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.readiness.wait_ready()).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ChatError::PollerStopped),
            Err(_) => Err(ChatError::ReadyTimeout {
                seconds: timeout.as_secs(),
            }),
        }
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        self.submitter.submit(text).await
    }

    pub fn set_draft(&self, text: &str) {
        self.submitter.set_draft(text);
    }

    pub async fn submit_draft(&self) -> SubmitOutcome {
        self.submitter.submit_draft().await
    }

    pub fn ui_state(&self) -> UiState {
        self.submitter.ui_state()
    }

    pub fn transcript(&self) -> Vec<DisplayMessage> {
        self.transcript.snapshot()
    }

    /// Stops the health poller if it is still running.
    pub async fn shutdown(mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
            poller.join().await;
        }
        tracing::debug!("Chat session closed with {} transcript entries", self.transcript.len());
    }
}
