//! Conversion dispatcher: routes uploaded files to the routine matching
//! the selected tool and wraps the produced bytes for download.

mod audio;
mod pdf;

pub use audio::{BITRATE_KBPS, SAMPLE_RATE_HZ, extract_mp3};
pub use pdf::{images_to_pdf, merge_pdfs};

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::error::ConvertError;
use crate::tools::ToolKind;
use crate::upload::ScratchFiles;

/// In-memory conversion output, consumed once by its response impl.
pub struct ConversionResult {
    pub bytes: Vec<u8>,
    pub download_name: &'static str,
    pub mime_type: &'static str,
}

impl IntoResponse for ConversionResult {
    fn into_response(self) -> Response {
        (
            [
                (header::CONTENT_TYPE, self.mime_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.download_name),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// Run the conversion for `kind` over the persisted uploads, in upload order.
///
/// PDF and image work is CPU-bound and runs under `spawn_blocking`; audio
/// extraction drives ffmpeg asynchronously. Each conversion is attempted
/// exactly once.
pub async fn convert(kind: ToolKind, files: &ScratchFiles) -> Result<ConversionResult, ConvertError> {
    match kind {
        ToolKind::MergePdf => {
            let paths = files.paths().to_vec();
            let bytes = tokio::task::spawn_blocking(move || pdf::merge_pdfs(&paths))
                .await
                .map_err(|e| ConvertError::Task(e.to_string()))??;
            Ok(ConversionResult {
                bytes,
                download_name: "merged.pdf",
                mime_type: "application/pdf",
            })
        }
        ToolKind::PngToPdf => {
            let paths = files.paths().to_vec();
            let bytes = tokio::task::spawn_blocking(move || pdf::images_to_pdf(&paths))
                .await
                .map_err(|e| ConvertError::Task(e.to_string()))??;
            Ok(ConversionResult {
                bytes,
                download_name: "images.pdf",
                mime_type: "application/pdf",
            })
        }
        ToolKind::Mp4ToMp3 => {
            if files.len() != 1 {
                return Err(ConvertError::InputCount {
                    expected: "exactly 1",
                    got: files.len(),
                });
            }
            let bytes = audio::extract_mp3(&files.paths()[0]).await?;
            Ok(ConversionResult {
                bytes,
                download_name: "audio.mp3",
                mime_type: "audio/mpeg",
            })
        }
    }
}
