//! Live adapter for the `AnalysisService` port over the review service's HTTP API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ReviewError};
use crate::model::Analysis;
use crate::ports::{
    AnalysisFuture, AnalysisRequest, AnalysisService, ChatReply, ChatRequest, PortError,
    ReplyRequest, ReplyResponse,
};

const ANALYZE_PATH: &str = "/api/analyze-rca";
const CHAT_PATH: &str = "/api/chat";
const REPLY_PATH: &str = "/api/process-reply";
const HEALTH_PATH: &str = "/api/health";

/// Analysis service client speaking JSON over HTTP.
pub struct HttpAnalysisService {
    client: Client,
    base_url: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `"ok"` when the service is up.
    pub status: String,
    /// Service name.
    #[serde(default)]
    pub service: String,
}

/// A 2xx body is either the payload or an `{"error": ...}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Failure { error: String },
    Success(T),
}

/// Error body of a non-2xx response.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(alias = "error")]
    detail: String,
}

impl HttpAnalysisService {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReviewError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Checks that the service is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn health(&self) -> std::result::Result<HealthStatus, PortError> {
        let response = self
            .client
            .get(format!("{}{HEALTH_PATH}", self.base_url))
            .send()
            .await
            .map_err(|e| -> PortError {
                format!("Analysis service unreachable: {e}").into()
            })?;
        let status = response.status();
        let text = response.text().await?;
        decode(HEALTH_PATH, status, &text)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> std::result::Result<T, PortError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| -> PortError {
                format!("Analysis service request failed: {e}").into()
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| -> PortError {
            format!("Failed to read analysis service response: {e}").into()
        })?;
        decode(path, status, &text)
    }
}

/// Turns a raw HTTP response into the payload or an error.
fn decode<T: DeserializeOwned>(
    path: &str,
    status: StatusCode,
    text: &str,
) -> std::result::Result<T, PortError> {
    if !status.is_success() {
        debug!(
            path,
            status = status.as_u16(),
            body = text,
            "analysis service error response"
        );
        let msg = serde_json::from_str::<ErrorBody>(text)
            .map(|e| e.detail)
            .ok();
        return Err(match msg {
            Some(msg) => format!("API request failed with status {}: {msg}", status.as_u16()),
            None => format!("API request failed with status {}", status.as_u16()),
        }
        .into());
    }

    match serde_json::from_str::<Envelope<T>>(text) {
        Ok(Envelope::Success(payload)) => Ok(payload),
        Ok(Envelope::Failure { error }) => Err(error.into()),
        Err(e) => Err(format!("Malformed response from {path}: {e}").into()),
    }
}

impl AnalysisService for HttpAnalysisService {
    fn analyze(&self, request: &AnalysisRequest) -> AnalysisFuture<'_, Analysis> {
        let request = request.clone();
        Box::pin(async move { self.post(ANALYZE_PATH, &request).await })
    }

    fn chat(&self, request: &ChatRequest) -> AnalysisFuture<'_, ChatReply> {
        let request = request.clone();
        Box::pin(async move { self.post(CHAT_PATH, &request).await })
    }

    fn process_reply(&self, request: &ReplyRequest) -> AnalysisFuture<'_, ReplyResponse> {
        let request = request.clone();
        Box::pin(async move { self.post(REPLY_PATH, &request).await })
    }
}
