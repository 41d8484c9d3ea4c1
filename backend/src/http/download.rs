//! Attachment responses built through [`download_blob`].
//!
//! [`download_blob`]: crate::services::export::download_blob

use axum::{
    body::{Body, Bytes},
    http::header,
    response::{IntoResponse, Response},
};
use log::debug;

use crate::services::export::{DownloadSink, ExportError, ExportFile, ExportResult};

/// Download sink that turns an export into one `attachment` response.
///
/// The handle owns the payload bytes; triggering builds the response from
/// it and releasing drops it.
#[derive(Debug, Default)]
pub struct ResponseSink {
    response: Option<Response>,
    outstanding: usize,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles acquired and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// The triggered response, if any download was triggered.
    pub fn into_response(self) -> Option<Response> {
        self.response
    }
}

impl DownloadSink for ResponseSink {
    type Handle = Bytes;

    fn acquire(&mut self, file: &ExportFile) -> ExportResult<Bytes> {
        if file.filename.contains(['"', '/', '\\', '\r', '\n']) {
            return Err(ExportError::InvalidFilename(file.filename.clone()));
        }
        self.outstanding += 1;
        Ok(Bytes::from(file.bytes.clone()))
    }

    fn trigger(&mut self, handle: &Bytes, file: &ExportFile) -> ExportResult<()> {
        let disposition = format!("attachment; filename=\"{}\"", file.filename);
        let response = (
            [
                (header::CONTENT_TYPE, file.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            Body::from(handle.clone()),
        )
            .into_response();
        self.response = Some(response);
        Ok(())
    }

    fn release(&mut self, handle: Bytes) {
        debug!("Released {} byte download handle", handle.len());
        self.outstanding -= 1;
    }
}
