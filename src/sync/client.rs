//! Sync client
//!
//! Posts a counter snapshot to the remote API and classifies the result.
//! No retries happen here; the next scheduler tick is the retry.

use crate::capture::input::types::CounterSnapshot;
use crate::storage::Identity;
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const CLICKS_PATH: &str = "/clicks";

/// Classified result of one sync attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Server acknowledged the counts
    Success,
    /// 401/403: credentials rejected
    AuthError,
    /// 5xx
    ServerError,
    /// Request never got a response (connect, timeout, reset)
    NetworkError,
    /// Missing username or token; nothing was sent
    InvalidIdentity,
    /// Any other refusal, including a 2xx with `success: false`
    Rejected { status: u16, message: String },
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Success)
    }

    /// Credential problems the login flow has to fix
    pub fn is_auth_problem(&self) -> bool {
        matches!(self, SyncOutcome::AuthError | SyncOutcome::InvalidIdentity)
    }
}

impl std::fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncOutcome::Success => write!(f, "success"),
            SyncOutcome::AuthError => write!(f, "authentication error"),
            SyncOutcome::ServerError => write!(f, "server error"),
            SyncOutcome::NetworkError => write!(f, "network error"),
            SyncOutcome::InvalidIdentity => write!(f, "invalid identity"),
            SyncOutcome::Rejected { status, message } => {
                write!(f, "rejected ({status}): {message}")
            }
        }
    }
}

/// Sends count snapshots to the remote collaborator
#[async_trait]
pub trait SyncTransport: Send + Sync {
    async fn send(&self, identity: &Identity, snapshot: &CounterSnapshot) -> SyncOutcome;
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API endpoint must not be empty")]
    EmptyEndpoint,

    #[error("HTTP client build failed: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP transport posting JSON to `{endpoint}/clicks` with a bearer token
#[derive(Debug, Clone)]
pub struct HttpSyncClient {
    client: Client,
    endpoint: String,
}

impl HttpSyncClient {
    /// Create a client for the API base URL (e.g. `http://localhost:3000/api`).
    ///
    /// `timeout` bounds the whole request; a timed-out request is a
    /// [`SyncOutcome::NetworkError`].
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ClientError::EmptyEndpoint);
        }
        let client = Client::builder().timeout(timeout).build()?;
        tracing::info!("Sync client initialized with endpoint {}", endpoint);
        Ok(Self { client, endpoint })
    }

    fn clicks_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), CLICKS_PATH)
    }
}

#[async_trait]
impl SyncTransport for HttpSyncClient {
    async fn send(&self, identity: &Identity, snapshot: &CounterSnapshot) -> SyncOutcome {
        if identity.username.is_empty() || identity.auth_token.is_empty() {
            tracing::debug!("Sync skipped: no username or auth token");
            return SyncOutcome::InvalidIdentity;
        }

        let request = WireSyncRequest::new(&identity.username, snapshot);
        let response = match self
            .client
            .post(self.clicks_url())
            .bearer_auth(&identity.auth_token)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Sync request failed: {}", e);
                return SyncOutcome::NetworkError;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("Sync rejected with status {}: {}", status, body);
            return classify_status(status, body);
        }

        match response.json::<WireSyncResponse>().await {
            Ok(body) if body.success => SyncOutcome::Success,
            Ok(body) => SyncOutcome::Rejected {
                status: status.as_u16(),
                message: body.message,
            },
            Err(e) => SyncOutcome::Rejected {
                status: status.as_u16(),
                message: format!("invalid response body: {e}"),
            },
        }
    }
}

/// Map a non-2xx status onto an outcome
fn classify_status(status: StatusCode, body: String) -> SyncOutcome {
    match status.as_u16() {
        401 | 403 => SyncOutcome::AuthError,
        500..=599 => SyncOutcome::ServerError,
        code => SyncOutcome::Rejected {
            status: code,
            message: body,
        },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSyncRequest<'a> {
    username: &'a str,
    mouse_clicks: u64,
    keyboard_presses: u64,
    timestamp: String,
}

impl<'a> WireSyncRequest<'a> {
    fn new(username: &'a str, snapshot: &CounterSnapshot) -> Self {
        Self {
            username,
            mouse_clicks: snapshot.mouse_clicks,
            keyboard_presses: snapshot.keyboard_presses,
            timestamp: snapshot
                .taken_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSyncResponse {
    success: bool,
    #[serde(default)]
    message: String,
}
