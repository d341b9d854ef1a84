//! Integration tests for the HTTP surface and the subscriber fan-out.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The clock is manual so timer values are exact.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use quizshow_core::{ManualClock, ShowConfig};
use quizshow_server::handlers::CommandResponse;
use quizshow_server::router::build_router;
use quizshow_server::state::AppState;
use quizshow_types::{ClientCommand, Phase, QuestionDraft, ServerEvent, ShowStatus, TimerUpdate};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tower::ServiceExt;

fn make_state() -> (Arc<AppState>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let state = Arc::new(AppState::new(&ShowConfig::default(), clock.clone()));
    (state, clock)
}

fn draft() -> QuestionDraft {
    QuestionDraft {
        text: String::from("Capital of France?"),
        options: vec![
            String::from("Paris"),
            String::from("Lyon"),
            String::from("Nice"),
            String::from("Lille"),
        ],
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_command(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/command")
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

#[tokio::test]
async fn index_returns_ok() {
    let (state, _) = make_state();
    let app = build_router(state);

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("phase=Stopped"));
    assert!(text.contains("clients=0"));
}

#[tokio::test]
async fn status_reports_initial_show() {
    let (state, _) = make_state();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["phase"], "stopped");
    assert_eq!(json["current"], 30);
    assert_eq!(json["max"], 30);
    assert_eq!(json["screen"], "logo");
    assert_eq!(json["hasQuestion"], false);
    assert_eq!(json["connectedClients"], 0);
}

#[tokio::test]
async fn status_follows_running_timer() {
    let (state, clock) = make_state();
    state.dispatch(ClientCommand::SetQuestion(draft())).await;
    state.dispatch(ClientCommand::RevealOptions).await;
    clock.advance_secs(12);

    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status: ShowStatus = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(status.phase, Phase::Running);
    assert_eq!(status.current, quizshow_types::TimerValue::Seconds(18));
    assert!(status.has_question);
    assert!(status.show_options);
}

#[tokio::test]
async fn command_applied_when_guard_passes() {
    let (state, _) = make_state();
    let app = build_router(state.clone());

    let body = r#"{"command":"set-question","data":{"text":"Q","options":["a","b","c","d"]}}"#;
    let response = app.oneshot(post_command(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: CommandResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(result.applied);
    assert!(result.events.is_empty());
    assert!(state.status().await.has_question);
}

#[tokio::test]
async fn command_ignored_when_guard_fails() {
    let (state, _) = make_state();
    let app = build_router(state.clone());

    // No question loaded yet.
    let response = app
        .oneshot(post_command(r#"{"command":"reveal-options"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: CommandResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(!result.applied);
    assert_eq!(result.recipients, 0);
    assert_eq!(state.status().await.phase, Phase::Stopped);
}

#[tokio::test]
async fn unknown_command_is_bad_request() {
    let (state, _) = make_state();
    let app = build_router(state);

    let response = app
        .oneshot(post_command(r#"{"command":"launch-fireworks"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (state, _) = make_state();
    let app = build_router(state);

    let response = app.oneshot(post_command("not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn request_sync_returns_recovery_resync() {
    let (state, _) = make_state();
    let app = build_router(state);

    let response = app
        .oneshot(post_command(r#"{"command":"request-sync"}"#))
        .await
        .unwrap();

    let result: CommandResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(result.applied);
    assert_eq!(
        result.events,
        vec![
            ServerEvent::ClearQuestion,
            ServerEvent::ChangeScreen(String::from("logo")),
            ServerEvent::phase(Phase::Stopped),
        ]
    );
}

#[tokio::test]
async fn negative_answer_index_is_ignored_not_rejected() {
    let (state, _) = make_state();
    state.dispatch(ClientCommand::SetQuestion(draft())).await;
    let app = build_router(state.clone());

    let response = app
        .oneshot(post_command(r#"{"command":"pick-answer","data":-1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: CommandResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert!(!result.applied);
    assert!(state.status().await.highlight.is_none());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (state, _) = make_state();
    let app = build_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nothing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn joined_client_gets_resync_then_broadcasts() {
    let (state, clock) = make_state();
    state.dispatch(ClientCommand::SetQuestion(draft())).await;
    state.dispatch(ClientCommand::RevealOptions).await;
    clock.advance_secs(5);

    let (mut subscription, resync) = state.join().await;
    assert!(matches!(resync.first(), Some(ServerEvent::DisplayQuestion(_))));
    assert!(resync.contains(&ServerEvent::RevealOptions));
    assert!(resync.contains(&ServerEvent::UpdateTimer(TimerUpdate {
        current: quizshow_types::TimerValue::Seconds(25),
        max: quizshow_types::TimerValue::Seconds(30),
        audio_trigger: false,
        start_position: Some(34),
    })));
    assert_eq!(resync.last(), Some(&ServerEvent::phase(Phase::Running)));

    let dispatch = state.dispatch(ClientCommand::SetScreen(String::from("question"))).await;
    assert!(matches!(
        dispatch,
        quizshow_core::Dispatch::Broadcast { recipients: 1 }
    ));

    let batch = subscription.recv().await.unwrap();
    assert_eq!(&*batch, &[ServerEvent::ChangeScreen(String::from("question"))]);
}

#[tokio::test]
async fn every_client_sees_the_same_batch() {
    let (state, _) = make_state();
    let (mut first, _) = state.join().await;
    let (mut second, _) = state.join().await;
    assert_eq!(state.subscribers.connected(), 2);

    state.dispatch(ClientCommand::SetQuestion(draft())).await;

    let a = first.recv().await.unwrap();
    let b = second.recv().await.unwrap();
    assert_eq!(a, b);
    assert!(matches!(a.first(), Some(ServerEvent::DisplayQuestion(_))));
}

#[tokio::test]
async fn removing_a_client_updates_count() {
    let (state, _) = make_state();
    let (first, _) = state.join().await;
    let (second, _) = state.join().await;
    assert_ne!(first.id(), second.id());

    assert_eq!(state.subscribers.remove(first), 1);
    assert_eq!(state.status().await.connected_clients, 1);
    assert_eq!(state.subscribers.remove(second), 0);
}

#[tokio::test]
async fn lagged_client_rejoins_with_question_cleared() {
    let (state, _) = make_state();
    state.dispatch(ClientCommand::SetQuestion(draft())).await;

    let (mut subscription, resync) = state.join().await;
    assert!(matches!(resync.first(), Some(ServerEvent::DisplayQuestion(_))));

    // The removal is buried under more batches than the backlog holds.
    state.dispatch(ClientCommand::RemoveQuestion).await;
    for _ in 0..300 {
        state
            .dispatch(ClientCommand::PlayAudio(String::from("applause")))
            .await;
    }
    assert!(matches!(
        subscription.recv().await,
        Err(RecvError::Lagged(_))
    ));

    let (_fresh, resync) = state.rejoin(subscription).await;
    assert_eq!(state.subscribers.connected(), 1);
    assert_eq!(
        resync,
        vec![
            ServerEvent::ClearQuestion,
            ServerEvent::ChangeScreen(String::from("logo")),
            ServerEvent::phase(Phase::Stopped),
        ]
    );
}
