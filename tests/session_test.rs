use anyhow::Result;
use httpmock::prelude::*;
use moderation_chat::core::submitter::LockState;
use moderation_chat::domain::model::DisplayBody;
use moderation_chat::{
    ChatSession, HttpModerationClient, Rejection, SubmitOutcome, Transcript,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const FAST_POLL: Duration = Duration::from_millis(20);

fn session_for(server: &MockServer) -> Result<ChatSession> {
    let client = HttpModerationClient::new(&server.base_url())?;
    Ok(ChatSession::with_poll_interval(
        Arc::new(client),
        Transcript::new(),
        FAST_POLL,
    ))
}

fn ready_health(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(json!({"status": "ready", "version": "lite-profanity"}));
    });
}

/// Submissions are dropped until a later poll sees the server ready.
#[tokio::test]
async fn test_submission_gated_until_ready() -> Result<()> {
    let server = MockServer::start();
    let loading = server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200).json_body(json!({"status": "loading"}));
    });
    let moderate = server.mock(|when, then| {
        when.method(POST).path("/moderate");
        then.status(200).json_body(json!({"status": "clean", "score": 0.5}));
    });

    let mut session = session_for(&server)?;
    session.start();

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(!session.is_ready());
    assert_eq!(
        session.submit("hello").await,
        SubmitOutcome::Rejected(Rejection::NotReady)
    );
    assert_eq!(moderate.hits(), 0);

    let notices = session.transcript();
    assert!(!notices.is_empty());
    assert!(notices
        .iter()
        .all(|m| m.text() == Some("Server is still loading models...")));

    loading.delete_async().await;
    ready_health(&server);

    session.wait_until_ready(Duration::from_secs(5)).await?;
    let notices_before = session.transcript().len();

    let outcome = session.submit("hello").await;
    assert!(matches!(outcome, SubmitOutcome::Completed(ref m) if !m.is_error));
    assert_eq!(moderate.hits(), 1);
    assert_eq!(session.transcript().len(), notices_before + 2);

    session.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_clean_scenario() -> Result<()> {
    let server = MockServer::start();
    ready_health(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/moderate")
            .json_body(json!({"text": "hello"}));
        then.status(200)
            .json_body(json!({"status": "clean", "score": 0.0123}));
    });

    let mut session = session_for(&server)?;
    session.start();
    session.wait_until_ready(Duration::from_secs(5)).await?;

    session.set_draft("hello");
    session.submit_draft().await;

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].label, "You");
    match &transcript[1].body {
        DisplayBody::Verdict {
            badge, confidence, ..
        } => {
            assert_eq!(badge.label, "Clean");
            assert_eq!(confidence, "1.23%");
        }
        other => panic!("unexpected body: {:?}", other),
    }

    let ui = session.ui_state();
    assert_eq!(ui.lock, LockState::Idle);
    assert!(ui.draft.is_empty());
    assert!(ui.focused);

    session.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_server_error_scenario_then_recovery() -> Result<()> {
    let server = MockServer::start();
    ready_health(&server);
    let overloaded = server.mock(|when, then| {
        when.method(POST).path("/moderate");
        then.status(500).json_body(json!({"detail": "model overloaded"}));
    });

    let mut session = session_for(&server)?;
    session.start();
    session.wait_until_ready(Duration::from_secs(5)).await?;

    session.submit("hello").await;
    let last = session.transcript().pop().unwrap();
    assert!(last.is_error);
    assert_eq!(last.text(), Some("model overloaded"));
    assert_eq!(overloaded.hits(), 1);

    // failures are not retried; the user resends
    overloaded.delete_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/moderate");
        then.status(200).json_body(json!({
            "status": "inappropriate",
            "score": 0.97,
            "source_language": "es",
            "translated_text": "hello"
        }));
    });

    session.submit("hola").await;
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 4);
    match &transcript[3].body {
        DisplayBody::Verdict {
            detected_language,
            translated_text,
            badge,
            confidence,
        } => {
            assert_eq!(detected_language.as_deref(), Some("ES"));
            assert_eq!(translated_text.as_deref(), Some("hello"));
            assert_eq!(badge.label, "Inappropriate");
            assert_eq!(confidence, "97.00%");
        }
        other => panic!("unexpected body: {:?}", other),
    }

    session.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn test_wait_until_ready_times_out() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(503).body("starting");
    });

    let mut session = session_for(&server)?;
    session.start();

    let err = session
        .wait_until_ready(Duration::from_millis(100))
        .await
        .unwrap_err();
    assert!(matches!(err, moderation_chat::ChatError::ReadyTimeout { .. }));
    assert!(session
        .transcript()
        .iter()
        .all(|m| m.text() == Some("Cannot connect to server")));

    session.shutdown().await;
    Ok(())
}
