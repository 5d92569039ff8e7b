//! API Client
//!
//! HTTP client for the Learn2Earn API.

use l2e_api::{
    ApprovedResponse, ErrorResponse, HealthResponse, ModerateRequest, ModerateResponse,
    SubmissionResponse, SubmissionStatusResponse,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{CliError, CliResult};

/// Moderation can wait on chain confirmation; allow for the receipt bound
const MODERATION_TIMEOUT_SECS: u64 = 180;

/// Learn2Earn API client
pub struct L2eClient {
    /// HTTP client
    client: Client,
    /// Base URL
    base_url: String,
}

impl L2eClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>) -> CliResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CliError::connection(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> CliResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| CliError::connection(e.to_string()))?;
        parse_response(response).await
    }

    /// Get health status
    pub async fn health(&self) -> CliResult<HealthResponse> {
        self.send(self.client.get(self.url("/health"))).await
    }

    /// All submissions
    pub async fn list_submissions(&self) -> CliResult<Vec<SubmissionResponse>> {
        self.send(self.client.get(self.url("/api/v1/submissions"))).await
    }

    /// Pending submissions
    pub async fn list_pending(&self) -> CliResult<Vec<SubmissionResponse>> {
        self.send(self.client.get(self.url("/api/v1/submissions/pending"))).await
    }

    /// Approved participants
    pub async fn list_approved(&self) -> CliResult<Vec<ApprovedResponse>> {
        self.send(self.client.get(self.url("/api/v1/submissions/approved"))).await
    }

    /// One submission's status
    pub async fn get_submission(&self, identity: &str) -> CliResult<SubmissionStatusResponse> {
        let url = self.url(&format!("/api/v1/submissions/{}", identity));
        self.send(self.client.get(url)).await
    }

    /// Approve or reject a submission
    pub async fn moderate(
        &self,
        identity: &str,
        moderator_key: &str,
        request: &ModerateRequest,
    ) -> CliResult<ModerateResponse> {
        let url = self.url(&format!("/api/v1/submissions/{}/approve", identity));
        let request = self
            .client
            .put(url)
            .header("x-moderator-key", moderator_key)
            .timeout(Duration::from_secs(MODERATION_TIMEOUT_SECS))
            .json(request);
        self.send(request).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> CliResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CliError::api(status.as_u16(), describe_error_body(&body)))
}

/// Render an `{error, code}` body, falling back to the raw text
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => format!("{}: {}", err.code, err.error),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_error_body() {
        assert_eq!(
            describe_error_body(r#"{"error":"Unauthorized","code":"UNAUTHORIZED"}"#),
            "UNAUTHORIZED: Unauthorized"
        );
        assert_eq!(describe_error_body("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_base_url_trimmed() {
        let client = L2eClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.url("/health"), "http://localhost:3001/health");
    }
}
