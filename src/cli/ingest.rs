//! Reading image files from disk into scan file descriptors.
//!
//! The MIME type is inferred from the file extension. Anything that is not an
//! `image/*` type is skipped, and the caller decides whether to warn.

use crate::error::{CliError, CliResult};
use crate::model::ImageFile;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files accepted and rejected by [`load_images`].
#[derive(Debug, Default)]
pub struct IngestOutcome {
    pub files: Vec<ImageFile>,
    /// Paths skipped because they are not images.
    pub skipped: Vec<PathBuf>,
}

/// Guess a MIME type from the extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "dcm" => "application/dicom",
        "zip" => "application/zip",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

/// Read each path and encode image files as `data:` URLs.
pub fn load_images(paths: &[PathBuf]) -> CliResult<IngestOutcome> {
    let mut outcome = IngestOutcome::default();

    for path in paths {
        let Some(mime) = mime_for_path(path).filter(|m| m.starts_with("image/")) else {
            debug!(path = %path.display(), "skipping non-image file");
            outcome.skipped.push(path.clone());
            continue;
        };

        let bytes = fs::read(path).map_err(|e| CliError::Ingest {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let data_url = format!("data:{};base64,{}", mime, STANDARD.encode(&bytes));

        debug!(file = %name, bytes = bytes.len(), mime, "ingested image");
        outcome
            .files
            .push(ImageFile::new(name, bytes.len() as u64, mime, data_url));
    }

    Ok(outcome)
}
