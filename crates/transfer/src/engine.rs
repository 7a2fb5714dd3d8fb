//! Storage client performing presigned POST uploads.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt, stream};
use reqwest::Body;
use reqwest::multipart::Part;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};
use uplink_protocol::constants::{UPLOAD_CHUNK_SIZE, UPLOAD_SUCCESS_STATUS};
use uplink_protocol::types::UploadAuthorization;

use crate::TransferError;
use crate::file::{FileSource, LocalFile};
use crate::form::FormPlan;
use crate::progress::{ProgressCallback, ProgressMeter};

/// Storage client tuning.
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Whole-request timeout. `None` lets large uploads run unbounded.
    pub timeout: Option<Duration>,
}

/// Uploads files straight to object storage.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
}

impl StorageClient {
    /// Creates a new storage client.
    pub fn new(options: StorageOptions) -> Result<Self, TransferError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Uploads `file` using `auth`. One call is one attempt; no retries.
    ///
    /// `on_progress` receives a non-decreasing percent; `100` is reported
    /// only once storage has confirmed the write.
    pub async fn upload(
        &self,
        auth: &UploadAuthorization,
        file: &LocalFile,
        on_progress: ProgressCallback,
    ) -> Result<(), TransferError> {
        let plan = FormPlan::from_authorization(auth)?;
        let meter = Arc::new(ProgressMeter::new(file.size(), on_progress));

        let body = file_body(file, Arc::clone(&meter)).await?;
        let part = Part::stream_with_length(body, file.size())
            .file_name(file.name().to_string())
            .mime_str(file.content_type())
            .map_err(|_| TransferError::InvalidContentType(file.content_type().to_string()))?;

        debug!(
            file = %file.name(),
            bytes = file.size(),
            parts = ?plan.part_names(),
            "starting transfer"
        );
        let (url, form) = plan.into_form(part);

        let resp = self.http.post(url).multipart(form).send().await?;
        let status = resp.status().as_u16();

        if status != UPLOAD_SUCCESS_STATUS {
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(file = %file.name(), status, error = %e, "failed to read rejection body");
                    String::new()
                }
            };
            warn!(file = %file.name(), status, "storage rejected upload");
            return Err(TransferError::Rejected { status, body });
        }

        meter.finish();
        info!(file = %file.name(), bytes = meter.sent(), "transfer complete");
        Ok(())
    }
}

/// Builds the streamed file body, metering every chunk handed to the transport.
async fn file_body(file: &LocalFile, meter: Arc<ProgressMeter>) -> Result<Body, TransferError> {
    match file.source() {
        FileSource::Memory(data) => Ok(metered(stream::iter(memory_chunks(data)), meter)),
        FileSource::Disk(path) => {
            let handle = tokio::fs::File::open(path).await?;
            let reader = ReaderStream::with_capacity(handle, UPLOAD_CHUNK_SIZE);
            Ok(metered(reader, meter))
        }
    }
}

fn memory_chunks(data: &Bytes) -> Vec<io::Result<Bytes>> {
    (0..data.len())
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(|start| Ok(data.slice(start..(start + UPLOAD_CHUNK_SIZE).min(data.len()))))
        .collect()
}

fn metered<S>(chunks: S, meter: Arc<ProgressMeter>) -> Body
where
    S: Stream<Item = io::Result<Bytes>> + Send + Sync + 'static,
{
    Body::wrap_stream(chunks.map(move |chunk| {
        if let Ok(bytes) = &chunk {
            meter.advance(bytes.len() as u64);
        }
        chunk
    }))
}
