//! Error types and their mapping to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the conversion routines.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input is not a readable PDF document.
    #[error("invalid PDF input: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Structurally unusable PDF (no pages or no catalog).
    #[error("malformed PDF: {0}")]
    MalformedPdf(&'static str),

    /// Input is not a decodable PNG image.
    #[error("invalid image input: {0}")]
    Image(#[from] image::ImageError),

    /// ffmpeg could not be run or exited with a failure.
    #[error("audio extraction failed: {reason}")]
    Ffmpeg {
        reason: String,
        stderr: Option<String>,
    },

    /// Wrong number of input files for the selected tool.
    #[error("expected {expected} input file(s), got {got}")]
    InputCount { expected: &'static str, got: usize },

    /// Blocking conversion task failed to complete.
    #[error("conversion task failed: {0}")]
    Task(String),
}

impl ConvertError {
    pub fn ffmpeg(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::Ffmpeg {
            reason: reason.into(),
            stderr,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Request-boundary error taxonomy.
///
/// Every failure a request can hit is mapped to a status code here;
/// nothing propagates past the handler as an opaque crash.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown tool slug.
    #[error("unknown tool")]
    NotFound,

    /// No file part present, or the first file had an empty filename.
    /// The tool handler turns this into a redirect back to the form.
    #[error("no file selected")]
    EmptyUpload,

    /// Request body exceeded the configured maximum.
    #[error("File too large. Max is {limit_mb} MB")]
    PayloadTooLarge { limit_mb: u64 },

    /// Multipart body could not be read.
    #[error("upload failed: {0}")]
    Upload(String),

    /// A conversion routine rejected the input.
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConvertError),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::EmptyUpload | Self::Upload(_) | Self::Conversion(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
