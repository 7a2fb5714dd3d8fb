//! Collaborator seams for the upload session.
//!
//! The session talks to the backend and to storage only through these
//! traits. Production impls wrap [`uplink_presign::Client`] and
//! [`uplink_transfer::StorageClient`]; tests plug in mocks.

use std::future::Future;
use std::pin::Pin;

use uplink_presign::AuthorizationError;
use uplink_protocol::types::{SignedReadLink, UploadAuthorization};
use uplink_transfer::{LocalFile, ProgressCallback, TransferError};

/// Boxed future returned by the seam traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Issues authorizations, read links and deletes.
pub trait Authorizer: Send + Sync {
    /// Requests a fresh one-time upload authorization.
    fn upload_authorization<'a>(
        &'a self,
        filename: &'a str,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<UploadAuthorization, AuthorizationError>>;

    /// Requests a fresh time-limited read link.
    fn read_link<'a>(
        &'a self,
        filename: &'a str,
    ) -> BoxFuture<'a, Result<SignedReadLink, AuthorizationError>>;

    /// Deletes the stored object.
    fn delete<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, Result<(), AuthorizationError>>;
}

/// Moves file bytes to storage.
pub trait Uploader: Send + Sync {
    /// Performs one transfer attempt.
    fn upload<'a>(
        &'a self,
        auth: &'a UploadAuthorization,
        file: &'a LocalFile,
        on_progress: ProgressCallback,
    ) -> BoxFuture<'a, Result<(), TransferError>>;
}

impl Authorizer for uplink_presign::Client {
    fn upload_authorization<'a>(
        &'a self,
        filename: &'a str,
        content_type: &'a str,
    ) -> BoxFuture<'a, Result<UploadAuthorization, AuthorizationError>> {
        Box::pin(self.request_upload_authorization(filename, content_type))
    }

    fn read_link<'a>(
        &'a self,
        filename: &'a str,
    ) -> BoxFuture<'a, Result<SignedReadLink, AuthorizationError>> {
        Box::pin(self.request_read_link(filename))
    }

    fn delete<'a>(&'a self, filename: &'a str) -> BoxFuture<'a, Result<(), AuthorizationError>> {
        Box::pin(self.request_delete(filename))
    }
}

impl Uploader for uplink_transfer::StorageClient {
    fn upload<'a>(
        &'a self,
        auth: &'a UploadAuthorization,
        file: &'a LocalFile,
        on_progress: ProgressCallback,
    ) -> BoxFuture<'a, Result<(), TransferError>> {
        Box::pin(uplink_transfer::StorageClient::upload(
            self,
            auth,
            file,
            on_progress,
        ))
    }
}
