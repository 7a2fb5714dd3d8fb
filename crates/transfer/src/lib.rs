//! Direct-to-storage uploads using presigned POST authorizations.
//!
//! One call to [`StorageClient::upload`] is one attempt: the authorization's
//! fields go into a multipart form in issuer order, the file bytes go last,
//! and only a `204 No Content` answer counts as success.

mod engine;
mod file;
mod form;
mod progress;

pub use engine::{StorageClient, StorageOptions};
pub use file::{FileSource, LocalFile, detect_content_type};
pub use form::{FormPart, FormPlan};
pub use progress::{ProgressCallback, ProgressMeter, percent_complete};

/// Errors produced by a transfer attempt.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("storage rejected upload ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid upload authorization: {0}")]
    InvalidAuthorization(String),

    #[error("invalid content type: {0}")]
    InvalidContentType(String),
}

impl TransferError {
    /// Raw diagnostic text for the user.
    ///
    /// Storage rejections yield the response body as sent by the service.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Rejected { status, body } if body.trim().is_empty() => {
                format!("upload failed with status {status}")
            }
            Self::Rejected { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_diagnostic_is_raw_body() {
        let err = TransferError::Rejected {
            status: 403,
            body: "Access Denied".into(),
        };
        assert_eq!(err.diagnostic(), "Access Denied");
    }

    #[test]
    fn empty_rejection_body_falls_back_to_status() {
        let err = TransferError::Rejected {
            status: 500,
            body: "  ".into(),
        };
        assert_eq!(err.diagnostic(), "upload failed with status 500");
    }

    #[test]
    fn other_errors_use_display() {
        let err = TransferError::InvalidAuthorization("missing url".into());
        assert_eq!(err.diagnostic(), "invalid upload authorization: missing url");
    }
}
