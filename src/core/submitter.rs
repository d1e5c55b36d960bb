use crate::core::classifier::{is_truthy, ErrorClassifier, Failure};
use crate::core::readiness::ReadinessFlag;
use crate::core::renderer::{Entry, ResultRenderer};
use crate::core::transcript::Transcript;
use crate::domain::model::{DisplayMessage, HttpReply, ModerationRequest, ModerationResult, Verdict};
use crate::domain::ports::ModerationService;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    Idle,
    Sending,
}

/// What the action button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Send,
    Busy,
}

/// Snapshot of the input panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub lock: LockState,
    pub input_enabled: bool,
    pub affordance: Affordance,
    pub draft: String,
    pub focused: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            lock: LockState::Idle,
            input_enabled: true,
            affordance: Affordance::Send,
            draft: String::new(),
            focused: true,
        }
    }
}

impl UiState {
    fn begin_sending(&mut self) {
        self.lock = LockState::Sending;
        self.input_enabled = false;
        self.affordance = Affordance::Busy;
    }

    fn finish(&mut self) {
        self.lock = LockState::Idle;
        self.input_enabled = true;
        self.affordance = Affordance::Send;
        self.draft.clear();
        self.focused = true;
    }
}

/// Why a submission was dropped. Never shown in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyInput,
    NotReady,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Rejected(Rejection),
    /// The request resolved; carries the entry appended for it.
    Completed(DisplayMessage),
}

/// Sends one moderation request at a time, gated on server readiness.
pub struct MessageSubmitter {
    service: Arc<dyn ModerationService>,
    readiness: ReadinessFlag,
    transcript: Transcript,
    renderer: ResultRenderer,
    classifier: ErrorClassifier,
    ui: Mutex<UiState>,
}

impl MessageSubmitter {
    pub fn new(
        service: Arc<dyn ModerationService>,
        readiness: ReadinessFlag,
        transcript: Transcript,
    ) -> Self {
        Self {
            service,
            readiness,
            transcript,
            renderer: ResultRenderer,
            classifier: ErrorClassifier,
            ui: Mutex::new(UiState::default()),
        }
    }

    fn ui(&self) -> MutexGuard<'_, UiState> {
        self.ui.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn ui_state(&self) -> UiState {
        self.ui().clone()
    }

    /// Edits the draft. Ignored while the input is disabled.
    pub fn set_draft(&self, text: &str) {
        let mut ui = self.ui();
        if ui.input_enabled {
            ui.draft = text.to_string();
        }
    }

    pub async fn submit_draft(&self) -> SubmitOutcome {
        let draft = self.ui().draft.clone();
        self.submit(&draft).await
    }

    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let Some(request) = ModerationRequest::new(text) else {
            return SubmitOutcome::Rejected(Rejection::EmptyInput);
        };
        if !self.readiness.is_ready() {
            tracing::debug!("Dropping submission: server not ready");
            return SubmitOutcome::Rejected(Rejection::NotReady);
        }

        {
            let mut ui = self.ui();
            if ui.lock == LockState::Sending {
                tracing::debug!("Dropping submission: a request is already in flight");
                return SubmitOutcome::Rejected(Rejection::Busy);
            }
            ui.begin_sending();
        }

        self.transcript
            .append(self.renderer.render(Entry::User(&request.text)));

        let message = match self.send(&request).await {
            Ok(result) => {
                tracing::info!(
                    "Moderation verdict {:?} (score {:.4})",
                    result.status,
                    result.score
                );
                self.renderer.render(Entry::Result(&result))
            }
            Err(failure) => {
                tracing::warn!("Moderation request failed ({}): {:?}", failure.kind(), failure);
                let record = self.classifier.classify(&failure);
                self.renderer.render(Entry::Error(&record))
            }
        };

        self.transcript.append(message.clone());
        self.ui().finish();
        SubmitOutcome::Completed(message)
    }

    async fn send(&self, request: &ModerationRequest) -> Result<ModerationResult, Failure> {
        tracing::debug!("Submitting {} characters for moderation", request.text.chars().count());
        match self.service.moderate(request).await {
            Ok(reply) => decode_verdict(reply),
            Err(e) => Err(Failure::Connectivity {
                message: e.to_string(),
            }),
        }
    }
}

/// Interprets a `/moderate` reply.
pub fn decode_verdict(reply: HttpReply) -> Result<ModerationResult, Failure> {
    if !reply.is_success() {
        return Err(Failure::Protocol {
            status: reply.status,
            body: reply.body,
        });
    }

    let body = reply.body.ok_or(Failure::MalformedResponse)?;
    let status = body
        .get("status")
        .filter(|v| is_truthy(v))
        .ok_or(Failure::MalformedResponse)?;
    // non-string verdicts are never "clean"
    let verdict = status
        .as_str()
        .map(Verdict::from_status)
        .unwrap_or(Verdict::Inappropriate);

    let text_field = |key: &str| {
        body.get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    Ok(ModerationResult {
        status: verdict,
        score: body.get("score").and_then(|v| v.as_f64()).unwrap_or(0.0),
        source_language: text_field("source_language"),
        translated_text: text_field("translated_text"),
    })
}
