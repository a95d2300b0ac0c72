//! Manual claim checks against a mocked HTTP backend.

mod common;

use common::{StreamServer, http_checker, spawn_with, wait};
use livefact_client::ConnectionState;
use livefact_core::errors::CHECK_FAILED_BANNER;
use livefact_core::fact::FactStatus;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn manual_result_replaces_streamed_results() {
    let stream = StreamServer::start().await;
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fact-check"))
        .and(body_json(json!({"claim": "The sky is green"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "claim": "The sky is green",
            "status": "false",
            "citations": [{"text": "Rayleigh scattering"}]
        })))
        .expect(1)
        .mount(&api)
        .await;

    let handle = spawn_with(&stream.url, http_checker(&api.uri()));
    handle.start().await.unwrap();
    stream.send(r#"{"results":[{"claim":"a","status":"true"},{"claim":"b","status":"true"}]}"#);
    let _ = wait(&handle, |s| s.results().len() == 2).await;

    handle.submit_manual("The sky is green").await.unwrap();
    let s = wait(&handle, |s| s.results().len() == 1).await;
    assert_eq!(s.results()[0].claim, "The sky is green");
    assert_eq!(s.results()[0].status, FactStatus::False);
    assert_eq!(s.results()[0].citations[0].url, None);
    assert_eq!(s.connection(), ConnectionState::Connected);
}

#[tokio::test]
async fn blank_claims_never_reach_the_backend() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({"claim": "marker"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"claim": "marker", "status": "true"})))
        .with_priority(1)
        .expect(1)
        .mount(&api)
        .await;

    let handle = spawn_with("ws://127.0.0.1:9/ws/audio", http_checker(&api.uri()));
    handle.submit_manual("").await.unwrap();
    handle.submit_manual("   ").await.unwrap();
    handle.submit_manual("marker").await.unwrap();
    let s = wait(&handle, |s| !s.results().is_empty()).await;
    assert_eq!(s.results()[0].claim, "marker");
    assert_eq!(s.connection(), ConnectionState::Idle);
}

#[tokio::test]
async fn failed_check_sets_banner_and_keeps_results() {
    let stream = StreamServer::start().await;
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fact-check"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;

    let handle = spawn_with(&stream.url, http_checker(&api.uri()));
    handle.start().await.unwrap();
    stream.send(r#"{"results":[{"claim":"a","status":"true"}]}"#);
    let _ = wait(&handle, |s| s.results().len() == 1).await;

    handle.submit_manual("c").await.unwrap();
    let s = wait(&handle, |s| s.last_error().is_some()).await;
    assert_eq!(s.last_error(), Some(CHECK_FAILED_BANNER));
    assert_eq!(s.results()[0].claim, "a");
}

#[tokio::test]
async fn unreachable_api_is_a_network_error() {
    let api = MockServer::start().await;
    let uri = api.uri();
    drop(api);

    let handle = spawn_with("ws://127.0.0.1:9/ws/audio", http_checker(&uri));
    handle.submit_manual("c").await.unwrap();
    let s = wait(&handle, |s| s.last_error().is_some()).await;
    assert!(s.last_error().unwrap().starts_with("Network error: "));
    assert!(!s.claim_pending());
}
