//! Upload session state machine.
//!
//! Owns the single file record, transfer progress and status message, and
//! mutates them only in response to its own actions and their completions.
//! Every mutation emits a [`SessionEvent`] while the state lock is held, so
//! observers see changes in the order they happened.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uplink_protocol::types::SignedReadLink;
use uplink_transfer::{LocalFile, ProgressCallback};

use crate::backend::{Authorizer, Uploader};
use crate::error::SessionError;
use crate::record::{FileRecord, FileStatus};
use crate::status::StatusMessage;
use crate::types::{SessionEvent, SessionSnapshot, UploadStatus};

/// Message shown after a confirmed upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";

/// Message shown after a confirmed delete.
pub const DELETE_SUCCESS_MESSAGE: &str = "File deleted";

#[derive(Default)]
struct SessionState {
    status: UploadStatus,
    progress: Option<u8>,
    message: Option<StatusMessage>,
    record: Option<FileRecord>,
    /// Incremented per selection; progress from older attempts is dropped.
    attempt: u64,
}

struct Shared {
    state: Mutex<SessionState>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
}

impl Shared {
    fn lock(&self) -> StateGuard<'_> {
        StateGuard {
            state: self.state.lock().unwrap_or_else(|e| e.into_inner()),
            events_tx: &self.events_tx,
        }
    }
}

/// Locked session state that reports each change as an event.
struct StateGuard<'a> {
    state: MutexGuard<'a, SessionState>,
    events_tx: &'a mpsc::UnboundedSender<SessionEvent>,
}

impl StateGuard<'_> {
    fn emit(&self, event: SessionEvent) {
        // No receiver just means nobody is rendering.
        let _ = self.events_tx.send(event);
    }

    fn set_status(&mut self, status: UploadStatus) {
        if self.state.status != status {
            self.state.status = status;
            self.emit(SessionEvent::StatusChanged(status));
        }
    }

    fn set_progress(&mut self, progress: Option<u8>) {
        if self.state.progress != progress {
            self.state.progress = progress;
            self.emit(SessionEvent::Progress(progress));
        }
    }

    fn set_message(&mut self, message: Option<StatusMessage>) {
        if self.state.message != message {
            self.state.message = message.clone();
            self.emit(SessionEvent::MessageChanged(message));
        }
    }

    fn set_record(&mut self, record: Option<FileRecord>) {
        if self.state.record != record {
            self.state.record = record.clone();
            self.emit(SessionEvent::RecordChanged(record));
        }
    }

    fn update_record(
        &mut self,
        transition: impl FnOnce(&mut FileRecord) -> Result<(), SessionError>,
    ) -> Result<(), SessionError> {
        let updated = match self.state.record.as_mut() {
            Some(record) => {
                transition(record)?;
                record.clone()
            }
            None => return Ok(()),
        };
        self.emit(SessionEvent::RecordChanged(Some(updated)));
        Ok(())
    }

    fn uploaded_name(&self) -> Option<String> {
        match &self.state.record {
            Some(record) if self.state.status == UploadStatus::Uploaded && record.can_view() => {
                Some(record.name.clone())
            }
            _ => None,
        }
    }
}

/// Drives one file at a time through authorize → transfer → report, and
/// offers view/delete for a confirmed upload.
pub struct UploadSession {
    authorizer: Arc<dyn Authorizer>,
    uploader: Arc<dyn Uploader>,
    shared: Arc<Shared>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<SessionEvent>>>,
}

impl UploadSession {
    /// Creates an idle session using the given collaborators.
    pub fn new(authorizer: Arc<dyn Authorizer>, uploader: Arc<dyn Uploader>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            authorizer,
            uploader,
            shared: Arc::new(Shared {
                state: Mutex::new(SessionState::default()),
                events_tx,
            }),
            events_rx: Mutex::new(Some(events_rx)),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.events_rx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    /// Returns the full presentation state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let s = self.shared.lock();
        SessionSnapshot {
            status: s.state.status,
            percent_complete: s.state.progress,
            message: s.state.message.clone(),
            record: s.state.record.clone(),
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.shared.lock().state.status
    }

    /// Returns the tracked file, if any.
    pub fn current_file(&self) -> Option<FileRecord> {
        self.shared.lock().state.record.clone()
    }

    /// Starts a new upload cycle for `file`.
    ///
    /// Previous record, progress and message are cleared before any
    /// network call. Rejected with [`SessionError::Busy`] while another
    /// attempt is in flight. Failures are recorded in the session state
    /// and also returned.
    pub async fn select_file(&self, file: LocalFile) -> Result<(), SessionError> {
        let attempt = self.begin_attempt(file.name())?;
        info!(
            attempt,
            file = %file.name(),
            content_type = %file.content_type(),
            bytes = file.size(),
            "file selected"
        );

        let auth = match self
            .authorizer
            .upload_authorization(file.name(), file.content_type())
            .await
        {
            Ok(auth) => auth,
            Err(e) => {
                warn!(attempt, file = %file.name(), error = %e, "upload authorization failed");
                self.fail_attempt(e.user_message())?;
                return Err(e.into());
            }
        };

        {
            let mut s = self.shared.lock();
            s.update_record(FileRecord::begin_upload)?;
            s.set_status(UploadStatus::Uploading);
        }
        debug!(attempt, url = %auth.destination_url, "authorization received");

        let result = self
            .uploader
            .upload(&auth, &file, self.progress_callback(attempt))
            .await;

        match result {
            Ok(()) => {
                let mut s = self.shared.lock();
                s.set_progress(None);
                s.set_message(Some(StatusMessage::success(UPLOAD_SUCCESS_MESSAGE)));
                s.update_record(FileRecord::mark_uploaded)?;
                s.set_status(UploadStatus::Uploaded);
                info!(attempt, file = %file.name(), "file was successfully uploaded");
                Ok(())
            }
            Err(e) => {
                warn!(attempt, file = %file.name(), error = %e, "upload failed");
                self.fail_attempt(e.diagnostic())?;
                Err(e.into())
            }
        }
    }

    /// Requests a fresh read link for the uploaded file.
    ///
    /// A failure is reported in the status message; the upload stays
    /// [`UploadStatus::Uploaded`].
    pub async fn view_current_file(&self) -> Result<SignedReadLink, SessionError> {
        let (name, attempt) = {
            let mut s = self.shared.lock();
            let name = s.uploaded_name().ok_or(SessionError::NoUploadedFile)?;
            s.set_message(None);
            (name, s.state.attempt)
        };
        debug!(attempt, file = %name, "requesting read link");

        let result = self.authorizer.read_link(&name).await;

        let mut s = self.shared.lock();
        // A newer selection owns the state now; keep its message and events.
        let current = s.state.attempt == attempt;
        match result {
            Ok(link) => {
                if current {
                    s.emit(SessionEvent::LinkReady {
                        name: name.clone(),
                        link: link.clone(),
                    });
                } else {
                    debug!(attempt, file = %name, "dropping read link for superseded upload");
                }
                Ok(link)
            }
            Err(e) => {
                warn!(attempt, file = %name, error = %e, "read link request failed");
                if current {
                    s.set_message(Some(StatusMessage::error(e.user_message())));
                }
                Err(e.into())
            }
        }
    }

    /// Deletes the uploaded file from storage.
    ///
    /// On success the record is cleared and the session returns to
    /// [`UploadStatus::Idle`]; on failure the record stays uploaded.
    pub async fn delete_current_file(&self) -> Result<(), SessionError> {
        let name = {
            let mut s = self.shared.lock();
            let name = s.uploaded_name().ok_or(SessionError::NoUploadedFile)?;
            s.set_message(None);
            s.update_record(FileRecord::begin_delete)?;
            name
        };
        info!(file = %name, "deleting file");

        // No attempt check needed: `select_file` is refused while the
        // record is `Deleting`.
        match self.authorizer.delete(&name).await {
            Ok(()) => {
                let mut s = self.shared.lock();
                s.update_record(FileRecord::mark_deleted)?;
                s.emit(SessionEvent::FileDeleted { name: name.clone() });
                s.set_record(None);
                s.set_message(Some(StatusMessage::success(DELETE_SUCCESS_MESSAGE)));
                s.set_status(UploadStatus::Idle);
                info!(file = %name, "file deleted");
                Ok(())
            }
            Err(e) => {
                warn!(file = %name, error = %e, "delete failed");
                let mut s = self.shared.lock();
                s.update_record(FileRecord::restore_uploaded)?;
                s.set_message(Some(StatusMessage::error(e.user_message())));
                Err(e.into())
            }
        }
    }

    /// Clears prior state and enters `Authorizing` for a new attempt.
    fn begin_attempt(&self, name: &str) -> Result<u64, SessionError> {
        let mut s = self.shared.lock();
        if s.state.status.is_in_flight() {
            return Err(SessionError::Busy(s.state.status));
        }
        if s
            .state
            .record
            .as_ref()
            .is_some_and(|r| r.status == FileStatus::Deleting)
        {
            return Err(SessionError::DeleteInProgress);
        }

        s.state.attempt += 1;
        s.set_record(None);
        s.set_progress(None);
        s.set_message(None);

        s.set_record(Some(FileRecord::selected(name)));
        s.set_status(UploadStatus::Selected);
        s.set_status(UploadStatus::Authorizing);
        Ok(s.state.attempt)
    }

    fn fail_attempt(&self, text: String) -> Result<(), SessionError> {
        let mut s = self.shared.lock();
        s.set_progress(None);
        s.set_message(Some(StatusMessage::error(text)));
        s.update_record(FileRecord::mark_errored)?;
        s.set_status(UploadStatus::Errored);
        Ok(())
    }

    fn progress_callback(&self, attempt: u64) -> ProgressCallback {
        let shared = Arc::clone(&self.shared);
        Arc::new(move |pct| {
            let mut s = shared.lock();
            if s.state.attempt != attempt || s.state.status != UploadStatus::Uploading {
                return;
            }
            if s.state.progress.is_some_and(|current| pct <= current) {
                return;
            }
            s.set_progress(Some(pct.min(100)));
        })
    }
}
