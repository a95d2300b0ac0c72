//! Request/response channel for one-shot claim checks.
//!
//! Independent of the streaming connection: a check can succeed while the
//! stream is down, and never touches connection state.

use std::time::Duration;

use async_trait::async_trait;
use livefact_core::errors::ClaimError;
use livefact_core::fact::FactCheckResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Checks a single claim against the backend.
#[async_trait]
pub trait ClaimChecker: Send + Sync {
    /// Submit `claim` and wait for the verdict.
    async fn check(&self, claim: &str) -> Result<FactCheckResult, ClaimError>;
}

#[derive(Serialize)]
struct ClaimRequest<'a> {
    claim: &'a str,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

/// `reqwest`-backed client for the backend's HTTP API.
#[derive(Clone, Debug)]
pub struct HttpClaimChecker {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClaimChecker {
    /// Client for the API rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, ClaimError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ClaimError::Network(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    /// Client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Probe `GET /health`. `Ok(false)` when the backend answers but is not healthy.
    pub async fn health(&self) -> Result<bool, ClaimError> {
        let response = self
            .client
            .get(self.endpoint("health"))
            .send()
            .await
            .map_err(|e| ClaimError::Network(e.to_string()))?;
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "health check failed");
            return Ok(false);
        }
        Ok(response
            .json::<HealthResponse>()
            .await
            .is_ok_and(|body| body.status == "healthy"))
    }
}

#[async_trait]
impl ClaimChecker for HttpClaimChecker {
    async fn check(&self, claim: &str) -> Result<FactCheckResult, ClaimError> {
        let response = self
            .client
            .post(self.endpoint("fact-check"))
            .json(&ClaimRequest { claim })
            .send()
            .await
            .map_err(|e| ClaimError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClaimError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<FactCheckResult>()
            .await
            .map_err(|e| ClaimError::Body(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use livefact_core::fact::FactStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn checker(server: &MockServer) -> HttpClaimChecker {
        HttpClaimChecker::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn check_posts_claim_and_decodes_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fact-check"))
            .and(body_json(json!({"claim": "The sky is green"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "claim": "The sky is green",
                "status": "false"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = checker(&server).check("The sky is green").await.unwrap();
        assert_eq!(result, FactCheckResult::new("The sky is green", FactStatus::False));
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fact-check"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = checker(&server).check("c").await.unwrap_err();
        assert_eq!(err, ClaimError::Status { status: 500 });
    }

    #[tokio::test]
    async fn bad_body_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fact-check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"verdict": "yes"})))
            .mount(&server)
            .await;

        let err = checker(&server).check("c").await.unwrap_err();
        assert_matches!(err, ClaimError::Body(_));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let err = HttpClaimChecker::new(uri, Duration::from_secs(2))
            .unwrap()
            .check("c")
            .await
            .unwrap_err();
        assert_matches!(err, ClaimError::Network(_));
    }

    #[tokio::test]
    async fn trailing_slash_in_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fact-check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"claim": "c", "status": "true"})))
            .expect(1)
            .mount(&server)
            .await;

        let checker = HttpClaimChecker::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(checker.check("c").await.unwrap().status, FactStatus::True);
    }

    #[tokio::test]
    async fn health_reports_backend_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
            .mount(&server)
            .await;
        assert!(checker(&server).health().await.unwrap());
    }

    #[tokio::test]
    async fn health_false_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        assert!(!checker(&server).health().await.unwrap());
    }
}
