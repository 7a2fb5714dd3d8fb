//! The single file tracked by a session.

use crate::error::SessionError;

/// Lifecycle of the tracked file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Selected,
    Uploading,
    Uploaded,
    Errored,
    Deleting,
    Deleted,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Selected => "selected",
            Self::Uploading => "uploading",
            Self::Uploaded => "uploaded",
            Self::Errored => "errored",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// The file currently associated with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub status: FileStatus,
}

impl FileRecord {
    /// A freshly chosen file.
    pub fn selected(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: FileStatus::Selected,
        }
    }

    /// View is offered only for a confirmed upload.
    pub fn can_view(&self) -> bool {
        self.status == FileStatus::Uploaded
    }

    /// Delete is offered only for a confirmed upload.
    pub fn can_delete(&self) -> bool {
        self.status == FileStatus::Uploaded
    }

    pub(crate) fn begin_upload(&mut self) -> Result<(), SessionError> {
        self.transition(&[FileStatus::Selected], FileStatus::Uploading)
    }

    pub(crate) fn mark_uploaded(&mut self) -> Result<(), SessionError> {
        self.transition(&[FileStatus::Uploading], FileStatus::Uploaded)
    }

    pub(crate) fn mark_errored(&mut self) -> Result<(), SessionError> {
        self.transition(
            &[FileStatus::Selected, FileStatus::Uploading],
            FileStatus::Errored,
        )
    }

    pub(crate) fn begin_delete(&mut self) -> Result<(), SessionError> {
        self.transition(&[FileStatus::Uploaded], FileStatus::Deleting)
    }

    pub(crate) fn mark_deleted(&mut self) -> Result<(), SessionError> {
        self.transition(&[FileStatus::Deleting], FileStatus::Deleted)
    }

    /// A failed delete leaves the object where it was.
    pub(crate) fn restore_uploaded(&mut self) -> Result<(), SessionError> {
        self.transition(&[FileStatus::Deleting], FileStatus::Uploaded)
    }

    fn transition(&mut self, from: &[FileStatus], to: FileStatus) -> Result<(), SessionError> {
        if !from.contains(&self.status) {
            return Err(SessionError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}
