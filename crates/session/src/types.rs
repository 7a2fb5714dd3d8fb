//! Presentation-facing state and events.

use uplink_protocol::types::SignedReadLink;

use crate::record::FileRecord;
use crate::status::StatusMessage;

/// Top-level state of the upload session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Selected,
    Authorizing,
    Uploading,
    Uploaded,
    Errored,
}

impl UploadStatus {
    /// Whether a transfer attempt is in flight.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Selected | Self::Authorizing | Self::Uploading)
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Selected => "selected",
            Self::Authorizing => "authorizing",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// Everything a presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: UploadStatus,
    /// Present only while a transfer is in flight.
    pub percent_complete: Option<u8>,
    pub message: Option<StatusMessage>,
    pub record: Option<FileRecord>,
}

/// Change notifications emitted by the session, in transition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StatusChanged(UploadStatus),
    Progress(Option<u8>),
    MessageChanged(Option<StatusMessage>),
    RecordChanged(Option<FileRecord>),
    /// A read link is ready to be opened.
    LinkReady { name: String, link: SignedReadLink },
    /// The stored object was deleted.
    FileDeleted { name: String },
}
