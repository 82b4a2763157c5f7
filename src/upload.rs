//! Multipart upload handling and scratch-file lifecycle.
//!
//! Uploaded files are written to the configured scratch directory under
//! per-request unique names. `ScratchFiles` owns every written path and
//! removes them on drop, so cleanup runs on all exit paths of a request.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;

/// Uploaded files persisted to the scratch directory, deleted on drop.
///
/// Deletion is best effort: failures are logged and never mask the
/// request's primary result.
pub struct ScratchFiles {
  paths: Vec<PathBuf>,
}

impl ScratchFiles {
  fn new() -> Self {
    Self { paths: Vec::new() }
  }

  /// Persisted paths, in upload order.
  pub fn paths(&self) -> &[PathBuf] {
    &self.paths
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }
}

impl Drop for ScratchFiles {
  fn drop(&mut self) {
    for path in &self.paths {
      if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
          tracing::warn!("Failed to remove scratch file {}: {}", path.display(), e);
        }
      }
    }
  }
}

/// Strip path components and unsafe characters from an uploaded filename.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Leading and trailing dots are trimmed so the result can never walk out
/// of the scratch directory.
pub fn sanitize_filename(name: &str) -> String {
  let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
  let cleaned: String = base
    .chars()
    .map(|c| {
      if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
        c
      } else {
        '_'
      }
    })
    .collect();
  let trimmed = cleaned.trim_matches('.');
  if trimmed.is_empty() {
    "upload".to_string()
  } else {
    trimmed.to_string()
  }
}

/// Receive the `file`/`files` parts of a multipart request into the
/// scratch directory.
///
/// Returns `EmptyUpload` when no file part arrives or the first one has an
/// empty filename, and `PayloadTooLarge` when the body limit is hit while
/// reading. Files already written stay owned by the returned guard (or the
/// partially filled one, which drops and cleans on the error paths).
pub async fn receive(mut multipart: Multipart, config: &AppConfig) -> Result<ScratchFiles, AppError> {
  let mut files = ScratchFiles::new();

  loop {
    let field = match multipart.next_field().await {
      Ok(Some(field)) => field,
      Ok(None) => break,
      Err(e) => return Err(map_multipart_error(e, config)),
    };

    let name = field.name().unwrap_or_default();
    if name != "file" && name != "files" {
      continue;
    }

    let original = field.file_name().unwrap_or_default().to_string();
    if original.is_empty() {
      if files.is_empty() {
        // Browsers submit one empty part when no file was selected
        return Err(AppError::EmptyUpload);
      }
      continue;
    }

    let bytes = field
      .bytes()
      .await
      .map_err(|e| map_multipart_error(e, config))?;

    let path = unique_scratch_path(&config.scratch_dir, &original);
    // Track before writing so a partial write is still cleaned up
    files.paths.push(path.clone());
    tokio::fs::write(&path, &bytes)
      .await
      .map_err(|e| AppError::Upload(format!("failed to persist upload: {}", e)))?;
  }

  if files.is_empty() {
    return Err(AppError::EmptyUpload);
  }
  Ok(files)
}

/// Unique per-request scratch path so concurrent requests never collide.
fn unique_scratch_path(scratch_dir: &Path, original: &str) -> PathBuf {
  scratch_dir.join(format!("{}_{}", Uuid::new_v4(), sanitize_filename(original)))
}

fn map_multipart_error(e: MultipartError, config: &AppConfig) -> AppError {
  if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
    AppError::PayloadTooLarge {
      limit_mb: config.max_upload_mb,
    }
  } else {
    AppError::Upload(e.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn sanitize_strips_path_traversal() {
    assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
    assert_eq!(sanitize_filename(".."), "upload");
  }

  #[test]
  fn sanitize_replaces_unsafe_characters() {
    assert_eq!(sanitize_filename("my report (final).pdf"), "my_report__final_.pdf");
    assert_eq!(sanitize_filename("söng.mp4"), "s_ng.mp4");
    assert_eq!(sanitize_filename("a b.png"), "a_b.png");
  }

  #[test]
  fn sanitize_keeps_ordinary_names() {
    assert_eq!(sanitize_filename("document.pdf"), "document.pdf");
    assert_eq!(sanitize_filename("image-01_final.png"), "image-01_final.png");
  }

  #[test]
  fn unique_paths_do_not_collide() {
    let dir = Path::new("/tmp/scratch");
    let a = unique_scratch_path(dir, "same.pdf");
    let b = unique_scratch_path(dir, "same.pdf");
    assert_ne!(a, b);
    assert!(a.starts_with(dir));
  }

  #[test]
  fn scratch_files_are_removed_on_drop() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let mut files = ScratchFiles::new();
    files.paths.push(path.clone());
    assert!(path.exists());
    drop(files);
    assert!(!path.exists());
  }

  #[test]
  fn drop_tolerates_already_deleted_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gone.pdf");

    let mut files = ScratchFiles::new();
    files.paths.push(path);
    drop(files); // must not panic
  }
}
