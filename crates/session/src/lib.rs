//! Upload session orchestration.
//!
//! This crate implements the **control flow** for sending one file to
//! object storage through a presigned POST. It has no UI: a presentation
//! layer drives it through three actions and renders its state.
//!
//! # Flow
//!
//! 1. **Select** — clear any previous file, progress and message
//! 2. **Authorize** — obtain a one-time upload authorization
//! 3. **Transfer** — POST fields + file to storage, reporting progress
//! 4. **Report** — success message and an uploaded file record, or the
//!    failure text and an errored record
//!
//! From an uploaded record the caller may request a signed read link or
//! delete the stored object.

pub mod backend;
pub mod error;
pub mod record;
pub mod session;
pub mod status;
pub mod types;

// Re-export primary types for convenience.
pub use backend::{Authorizer, Uploader};
pub use error::SessionError;
pub use record::{FileRecord, FileStatus};
pub use session::{DELETE_SUCCESS_MESSAGE, UPLOAD_SUCCESS_MESSAGE, UploadSession};
pub use status::{MessageKind, StatusMessage};
pub use types::{SessionEvent, SessionSnapshot, UploadStatus};
