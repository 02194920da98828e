//! Reqwest-backed FCM HTTP v1 messenger.
//!
//! This adapter owns transport details only: request serialisation, bearer
//! authentication, timeout handling and HTTP error mapping.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

use super::credentials::FcmAccessToken;
use super::dto::{ErrorResponseDto, SendRequestDto};
use crate::domain::ports::{
    MulticastPushMessage, MulticastReport, PushMessage, PushMessenger, PushMessengerError,
};

/// Production FCM API root.
pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com/";
const MULTICAST_CONCURRENCY: usize = 16;
const UNREGISTERED: &str = "UNREGISTERED";

/// Errors raised while building the messenger.
#[derive(Debug, thiserror::Error)]
pub enum FcmSetupError {
    /// The project id is blank or contains a path separator.
    #[error("invalid FCM project id '{project_id}'")]
    InvalidProjectId { project_id: String },
    /// The send URL could not be derived from the endpoint.
    #[error("invalid FCM endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    /// The HTTP client could not be constructed.
    #[error("failed to build FCM HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for [`FcmHttpMessenger`].
#[derive(Debug, Clone)]
pub struct FcmHttpConfig {
    /// API root, normally [`DEFAULT_FCM_ENDPOINT`].
    pub endpoint: Url,
    /// Firebase project id.
    pub project_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// `PushMessenger` backed by the FCM HTTP v1 API.
pub struct FcmHttpMessenger {
    client: Client,
    send_url: Url,
    access_token: FcmAccessToken,
}

impl FcmHttpMessenger {
    /// Build a messenger posting to `{endpoint}v1/projects/{project}/messages:send`.
    ///
    /// # Errors
    ///
    /// Returns [`FcmSetupError`] when the project id or endpoint is invalid or
    /// the HTTP client cannot be built.
    pub fn new(config: FcmHttpConfig, access_token: FcmAccessToken) -> Result<Self, FcmSetupError> {
        let send_url = send_url(&config.endpoint, &config.project_id)?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            send_url,
            access_token,
        })
    }

    /// The resolved `messages:send` URL.
    pub fn send_url(&self) -> &Url {
        &self.send_url
    }
}

fn send_url(endpoint: &Url, project_id: &str) -> Result<Url, FcmSetupError> {
    let project_id = project_id.trim();
    if project_id.is_empty() || project_id.contains('/') {
        return Err(FcmSetupError::InvalidProjectId {
            project_id: project_id.to_owned(),
        });
    }
    Ok(endpoint.join(&format!("v1/projects/{project_id}/messages:send"))?)
}

#[async_trait]
impl PushMessenger for FcmHttpMessenger {
    async fn send(&self, message: &PushMessage) -> Result<(), PushMessengerError> {
        let response = self
            .client
            .post(self.send_url.clone())
            .bearer_auth(self.access_token.expose())
            .json(&SendRequestDto::from_message(message))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(token = %message.token, "fcm accepted message");
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    async fn send_multicast(
        &self,
        message: &MulticastPushMessage,
    ) -> Result<MulticastReport, PushMessengerError> {
        let messages: Vec<PushMessage> = message
            .tokens
            .iter()
            .map(|token| message.for_token(token))
            .collect();
        let results: Vec<Result<(), PushMessengerError>> = stream::iter(messages)
            .map(|single| async move { self.send(&single).await })
            .buffer_unordered(MULTICAST_CONCURRENCY)
            .collect()
            .await;

        let mut report = MulticastReport::default();
        let mut credential_failure = None;
        for result in results {
            match result {
                Ok(()) => report.success_count += 1,
                Err(err) => {
                    report.failure_count += 1;
                    if matches!(err, PushMessengerError::Unauthenticated { .. }) {
                        credential_failure = Some(err);
                    } else {
                        warn!(error = %err, "fcm multicast delivery failed for one token");
                    }
                }
            }
        }
        if report.success_count == 0 && report.failure_count > 0 {
            if let Some(err) = credential_failure {
                return Err(err);
            }
        }
        Ok(report)
    }
}

fn map_transport_error(error: reqwest::Error) -> PushMessengerError {
    if error.is_timeout() {
        PushMessengerError::timeout(error.to_string())
    } else {
        PushMessengerError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PushMessengerError {
    let decoded = serde_json::from_slice::<ErrorResponseDto>(body).ok();
    let detail = decoded
        .as_ref()
        .map(|dto| dto.error.summary())
        .filter(|summary| !summary.is_empty())
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };
    let unregistered = decoded
        .as_ref()
        .and_then(|dto| dto.error.fcm_error_code())
        .is_some_and(|code| code == UNREGISTERED);

    match status {
        _ if unregistered => PushMessengerError::unregistered_token(message),
        StatusCode::NOT_FOUND => PushMessengerError::unregistered_token(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PushMessengerError::unauthenticated(message)
        }
        StatusCode::TOO_MANY_REQUESTS => PushMessengerError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            PushMessengerError::timeout(message)
        }
        _ if status.is_client_error() => PushMessengerError::invalid_message(message),
        _ => PushMessengerError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
