//! Session error types.

use uplink_presign::AuthorizationError;
use uplink_transfer::TransferError;

use crate::record::FileStatus;
use crate::types::UploadStatus;

/// Errors produced by session actions.
///
/// Backend and transfer failures are recorded in the session state
/// before they are returned.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("an upload is already in progress ({0})")]
    Busy(UploadStatus),

    #[error("a delete is in progress")]
    DeleteInProgress,

    #[error("no uploaded file")]
    NoUploadedFile,

    #[error("invalid file transition: {from} -> {to}")]
    InvalidTransition { from: FileStatus, to: FileStatus },

    #[error("authorization error: {0}")]
    Authorization(#[from] AuthorizationError),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
}

impl SessionError {
    /// Plain text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authorization(e) => e.user_message(),
            Self::Transfer(e) => e.diagnostic(),
            other => other.to_string(),
        }
    }

    /// Whether the failure is already shown as the session's status message.
    pub fn is_reported(&self) -> bool {
        matches!(self, Self::Authorization(_) | Self::Transfer(_))
    }
}
