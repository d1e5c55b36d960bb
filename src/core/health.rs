use crate::core::readiness::{ReadinessFlag, ReadinessSetter};
use crate::core::renderer::{Entry, ResultRenderer};
use crate::core::transcript::Transcript;
use crate::domain::model::{HealthStatus, HttpReply};
use crate::domain::ports::ModerationService;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const STILL_LOADING: &str = "Server is still loading models...";
pub const CANNOT_CONNECT: &str = "Cannot connect to server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready,
    StillLoading,
    Unreachable,
}

/// Polls `GET /health` until the service reports ready.
pub struct HealthMonitor {
    service: Arc<dyn ModerationService>,
    readiness: ReadinessSetter,
    transcript: Transcript,
    renderer: ResultRenderer,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(
        service: Arc<dyn ModerationService>,
        readiness: ReadinessSetter,
        transcript: Transcript,
    ) -> Self {
        Self {
            service,
            readiness,
            transcript,
            renderer: ResultRenderer,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn readiness(&self) -> ReadinessFlag {
        self.readiness.flag()
    }

    /// One readiness check. Appends at most one notice; none when ready.
    pub async fn poll(&self) -> PollOutcome {
        let outcome = match self.service.fetch_health().await {
            Ok(reply) => interpret(&reply),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                PollOutcome::Unreachable
            }
        };

        match outcome {
            PollOutcome::Ready => self.readiness.mark_ready(),
            PollOutcome::StillLoading => {
                self.transcript.append(self.renderer.render(Entry::Notice(STILL_LOADING)))
            }
            PollOutcome::Unreachable => {
                self.transcript.append(self.renderer.render(Entry::Notice(CANNOT_CONNECT)))
            }
        }
        outcome
    }

    /// Polls until ready, waiting a fixed interval between attempts. The next
    /// attempt starts only after the previous one resolved.
    pub async fn run(self) {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            let outcome = self.poll().await;
            if outcome == PollOutcome::Ready {
                tracing::info!("✅ Moderation server ready after {} health check(s)", attempts);
                return;
            }
            tracing::debug!(
                "Health check #{} returned {:?}, retrying in {:?}",
                attempts,
                outcome,
                self.interval
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    pub fn spawn(self) -> PollHandle {
        PollHandle {
            task: tokio::spawn(self.run()),
        }
    }
}

fn interpret(reply: &HttpReply) -> PollOutcome {
    let Some(body) = reply.body.as_ref() else {
        return PollOutcome::Unreachable;
    };

    let status = body
        .get("status")
        .and_then(|v| v.as_str())
        .map(HealthStatus::from_status);

    match status {
        Some(HealthStatus::Ready) if reply.is_success() => {
            if let Some(version) = body.get("version").and_then(|v| v.as_str()) {
                tracing::info!("Server version: {}", version);
            }
            PollOutcome::Ready
        }
        Some(HealthStatus::Ready) => {
            tracing::debug!("Server reported ready with HTTP status {}, not trusting it", reply.status);
            PollOutcome::StillLoading
        }
        Some(HealthStatus::Loading(other)) => {
            tracing::debug!("Server reported status '{}'", other);
            PollOutcome::StillLoading
        }
        None => {
            tracing::debug!("Health response has no string status field");
            PollOutcome::StillLoading
        }
    }
}

/// Handle to the background polling task.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the poller to end, either by observing readiness or by `stop`.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                tracing::warn!("Health poller ended abnormally: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpModerationClient;
    use crate::core::readiness::readiness_channel;
    use httpmock::prelude::*;

    fn monitor_for(base_url: &str) -> (HealthMonitor, Transcript) {
        let transcript = Transcript::new();
        let (setter, _flag) = readiness_channel();
        let client = HttpModerationClient::new(base_url).unwrap();
        let monitor = HealthMonitor::new(Arc::new(client), setter, transcript.clone())
            .with_interval(Duration::from_millis(20));
        (monitor, transcript)
    }

    #[tokio::test]
    async fn test_poll_ready_sets_flag_without_notice() {
        let server = MockServer::start();
        let health_mock = server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"status": "ready", "version": "lite-profanity"}));
        });

        let (monitor, transcript) = monitor_for(&server.base_url());
        let flag = monitor.readiness();

        assert_eq!(monitor.poll().await, PollOutcome::Ready);
        health_mock.assert();
        assert!(flag.is_ready());
        assert!(transcript.is_empty());
    }

    #[tokio::test]
    async fn test_poll_loading_appends_notice() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(200).json_body(serde_json::json!({"status": "loading"}));
        });

        let (monitor, transcript) = monitor_for(&server.base_url());

        assert_eq!(monitor.poll().await, PollOutcome::StillLoading);
        assert!(!monitor.readiness().is_ready());
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().text(), Some(STILL_LOADING));
    }

    #[tokio::test]
    async fn test_poll_ready_with_error_status_is_not_ready() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(503).json_body(serde_json::json!({"status": "ready"}));
        });

        let (monitor, _transcript) = monitor_for(&server.base_url());

        assert_eq!(monitor.poll().await, PollOutcome::StillLoading);
        assert!(!monitor.readiness().is_ready());
    }

    #[test]
    fn test_interpret_without_status_is_still_loading() {
        let reply = HttpReply {
            status: 200,
            body: Some(serde_json::json!({"version": "lite-profanity"})),
        };
        assert_eq!(interpret(&reply), PollOutcome::StillLoading);

        let reply = HttpReply {
            status: 200,
            body: Some(serde_json::json!({"status": 1})),
        };
        assert_eq!(interpret(&reply), PollOutcome::StillLoading);

        let reply = HttpReply {
            status: 500,
            body: Some(serde_json::json!({"status": "ready"})),
        };
        assert_eq!(interpret(&reply), PollOutcome::StillLoading);
    }

    #[tokio::test]
    async fn test_poll_non_json_is_unreachable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/health");
            then.status(502).body("<html>Bad Gateway</html>");
        });

        let (monitor, transcript) = monitor_for(&server.base_url());

        assert_eq!(monitor.poll().await, PollOutcome::Unreachable);
        assert_eq!(transcript.last().unwrap().text(), Some(CANNOT_CONNECT));
    }

    #[tokio::test]
    async fn test_poll_connection_refused_is_unreachable() {
        let (monitor, transcript) = monitor_for("http://127.0.0.1:1");

        assert_eq!(monitor.poll().await, PollOutcome::Unreachable);
        assert!(!monitor.readiness().is_ready());
        assert_eq!(transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_stop_cancels_polling() {
        let (monitor, transcript) = monitor_for("http://127.0.0.1:1");
        let handle = monitor.spawn();

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.stop();
        handle.join().await;

        let seen = transcript.len();
        assert!(seen >= 1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(transcript.len(), seen);
    }
}
