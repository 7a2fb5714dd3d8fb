//! GraphQL client for the authorization backend.
//!
//! Async HTTP client using `reqwest`. One POST per operation.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uplink_protocol::constants::{DEFAULT_BACKEND_URL, Operation};
use uplink_protocol::envelope::{GraphQlRequest, GraphQlResponse};
use uplink_protocol::messages::{FilenameVars, PresignedPostPayload, PresignedUploadVars};
use uplink_protocol::types::{SignedReadLink, UploadAuthorization};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from the authorization backend.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("{0}")]
    Rejected(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend returned no data for {0}")]
    MissingData(Operation),

    #[error("invalid backend endpoint: {0}")]
    InvalidEndpoint(String),
}

impl AuthorizationError {
    /// Text shown to the user for this failure.
    ///
    /// GraphQL rejections are surfaced verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Client tuning.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Authorization backend client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
}

impl Client {
    /// Creates a client for the backend at `endpoint`.
    pub fn new(endpoint: &str, options: ClientOptions) -> Result<Self, AuthorizationError> {
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AuthorizationError::InvalidEndpoint(endpoint.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Creates a client for the default local backend.
    pub fn local() -> Result<Self, AuthorizationError> {
        Self::new(DEFAULT_BACKEND_URL, ClientOptions::default())
    }

    /// Returns the backend endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Requests a one-time upload authorization for `filename`.
    pub async fn request_upload_authorization(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadAuthorization, AuthorizationError> {
        let vars = PresignedUploadVars {
            filename: filename.to_string(),
            filetype: content_type.to_string(),
        };
        let payload: PresignedPostPayload = self
            .execute(Operation::PresignedUploadPost, &vars)
            .await?
            .ok_or(AuthorizationError::MissingData(Operation::PresignedUploadPost))?;

        let auth = UploadAuthorization::from(payload);
        debug!(
            filename,
            url = %auth.destination_url,
            fields = auth.form_fields.len(),
            "upload authorization issued"
        );
        Ok(auth)
    }

    /// Requests a time-limited read link for `filename`.
    pub async fn request_read_link(
        &self,
        filename: &str,
    ) -> Result<SignedReadLink, AuthorizationError> {
        let vars = FilenameVars {
            filename: filename.to_string(),
        };
        let url: String = self
            .execute(Operation::GetSignedUrl, &vars)
            .await?
            .ok_or(AuthorizationError::MissingData(Operation::GetSignedUrl))?;
        Ok(SignedReadLink::new(url))
    }

    /// Asks the backend to delete `filename`.
    ///
    /// A `null` result counts as success; an explicit `false` does not.
    pub async fn request_delete(&self, filename: &str) -> Result<(), AuthorizationError> {
        let vars = FilenameVars {
            filename: filename.to_string(),
        };
        let acknowledged: Option<bool> = self.execute(Operation::DeleteObject, &vars).await?;
        if acknowledged == Some(false) {
            return Err(AuthorizationError::Rejected(
                "delete was not acknowledged".into(),
            ));
        }
        Ok(())
    }

    /// Performs one GraphQL round trip and extracts the operation's field.
    async fn execute<V: Serialize, T: DeserializeOwned>(
        &self,
        operation: Operation,
        variables: &V,
    ) -> Result<Option<T>, AuthorizationError> {
        let request = GraphQlRequest::new(operation, variables)?;
        debug!(%operation, endpoint = %self.endpoint, "sending backend request");

        let resp = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;

        // GraphQL servers commonly report validation failures with a 4xx
        // status and an `errors` body; prefer the error text when present.
        let parsed = serde_json::from_slice::<GraphQlResponse>(&body);
        if let Ok(envelope) = &parsed {
            if let Some(message) = envelope.error_message() {
                warn!(%operation, status = status.as_u16(), %message, "backend rejected request");
                return Err(AuthorizationError::Rejected(message));
            }
        }

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(%operation, status = status.as_u16(), "backend request failed");
            return Err(AuthorizationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut envelope = parsed?;
        Ok(envelope.take_field(operation)?)
    }
}
