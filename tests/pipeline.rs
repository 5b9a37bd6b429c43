//! Listen-loop stage tests
//!
//! Runs transcribe → interpret → dispatch without audio hardware, using a
//! scripted transcriber and the mock relay server.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use voxrelay::voice::Transcriber;
use voxrelay::{Error, Outcome, Pipeline, Result};

mod common;
use common::{relay_client, spawn_relay_server, unused_base_url};

/// Replays canned transcription results
struct ScriptedTranscriber {
    results: Mutex<VecDeque<Result<String>>>,
}

impl ScriptedTranscriber {
    fn new(results: Vec<Result<String>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        assert_eq!(&wav[0..4], b"RIFF");
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(Error::NotUnderstood))
    }
}

fn speech() -> Vec<f32> {
    vec![0.2; 1600]
}

#[tokio::test]
async fn test_spoken_power_command() {
    let (url, server) = spawn_relay_server().await;
    let stt = ScriptedTranscriber::new(vec![Ok("Relay two on".to_string())]);
    let pipeline = Pipeline::new(relay_client(&url), stt);

    pipeline.handle_audio(&speech()).await.unwrap();

    assert_eq!(server.requests(), vec!["/relay/2/on"]);
    assert_eq!(server.relay(2), (true, 0));
}

#[tokio::test]
async fn test_misheard_two_as_to() {
    let (url, server) = spawn_relay_server().await;
    let stt = ScriptedTranscriber::new(vec![Ok("relay to brightness 150".to_string())]);
    let pipeline = Pipeline::new(relay_client(&url), stt);

    pipeline.handle_audio(&speech()).await.unwrap();

    assert_eq!(server.requests(), vec!["/relay/2/brightness/100"]);
    assert_eq!(server.relay(2), (true, 100));
}

#[tokio::test]
async fn test_not_understood_continues() {
    let (url, server) = spawn_relay_server().await;
    let stt = ScriptedTranscriber::new(vec![Err(Error::NotUnderstood)]);
    let pipeline = Pipeline::new(relay_client(&url), stt);

    assert!(pipeline.handle_audio(&speech()).await.is_ok());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_stt_service_failure_is_fatal() {
    let (url, server) = spawn_relay_server().await;
    let stt = ScriptedTranscriber::new(vec![Err(Error::Stt("quota exceeded".to_string()))]);
    let pipeline = Pipeline::new(relay_client(&url), stt);

    let err = pipeline.handle_audio(&speech()).await.unwrap_err();
    assert!(matches!(err, Error::Stt(_)));
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_relay_failure_continues() {
    let stt = ScriptedTranscriber::new(vec![Ok("state".to_string())]);
    let pipeline = Pipeline::new(relay_client(&unused_base_url().await), stt);

    assert!(pipeline.handle_audio(&speech()).await.is_ok());
}

#[tokio::test]
async fn test_malformed_relay_response_continues() {
    let (url, server) = spawn_relay_server().await;
    server.respond_with(StatusCode::OK, json!({ "error": "invalid" }));
    let stt = ScriptedTranscriber::new(vec![
        Ok("state".to_string()),
        Ok("relay one on".to_string()),
    ]);
    let pipeline = Pipeline::new(relay_client(&url), stt);

    assert!(pipeline.handle_audio(&speech()).await.is_ok());
    assert!(pipeline.handle_audio(&speech()).await.is_ok());
    assert_eq!(server.requests(), vec!["/status", "/relay/1/on"]);
}

#[tokio::test]
async fn test_unrecognized_sends_nothing() {
    let (url, server) = spawn_relay_server().await;
    let pipeline = Pipeline::new(relay_client(&url), ScriptedTranscriber::new(vec![]));

    let outcome = pipeline.handle_transcript("turn on the lights").await.unwrap();
    assert_eq!(outcome, Outcome::Unrecognized("turn on the lights".to_string()));

    let outcome = pipeline.handle_transcript("relay 5 on").await.unwrap();
    assert!(matches!(outcome, Outcome::Unrecognized(_)));

    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_state_query_after_changes() {
    let (url, _server) = spawn_relay_server().await;
    let pipeline = Pipeline::new(relay_client(&url), ScriptedTranscriber::new(vec![]));

    pipeline.handle_transcript("relay 1 on").await.unwrap();
    pipeline
        .handle_transcript("relay three brightness 40")
        .await
        .unwrap();

    let Outcome::Status(states) = pipeline
        .handle_transcript("what's the state of relay 2 on")
        .await
        .unwrap()
    else {
        panic!("state has priority over other patterns");
    };
    assert!(states["1"].on);
    assert_eq!(states["3"].brightness, 40);
    assert!(!states["2"].on);
}

#[tokio::test]
async fn test_relay_error_returned_from_transcript() {
    let (url, server) = spawn_relay_server().await;
    server.set_failing(true);
    let pipeline = Pipeline::new(relay_client(&url), ScriptedTranscriber::new(vec![]));

    let err = pipeline.handle_transcript("relay 4 off").await.unwrap_err();
    assert!(matches!(err, Error::Relay { status: 503, .. }));
}
