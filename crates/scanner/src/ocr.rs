//! Text extraction from receipt images.
//!
//! The default engine shells out to the Tesseract CLI, piping the image on
//! stdin and reading recognized text from stdout. A single best-effort pass
//! is made per call; there are no retries.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::instrument;

use crate::config::OcrConfig;

/// Errors from text extraction.
#[derive(Debug, Error)]
pub enum OcrError {
    /// Recognition finished but found nothing but whitespace.
    #[error("No text extracted from the image.")]
    NoText,

    /// The image could not be read.
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),

    /// The OCR engine failed to start or exited unsuccessfully.
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// A user-supplied receipt image. Lives for one scan.
#[derive(Clone)]
pub struct ReceiptImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl std::fmt::Debug for ReceiptImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptImage")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl ReceiptImage {
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image file, inferring the mime type from its extension.
    ///
    /// # Errors
    ///
    /// Returns `OcrError::Io` if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, OcrError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(bytes, mime_type_for(path)))
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Converts an image into raw text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Run recognition once. May return empty text; callers decide whether
    /// that is an error.
    async fn recognize(&self, image: &ReceiptImage) -> Result<String, OcrError>;
}

/// Run OCR and reject whitespace-only output.
///
/// # Errors
///
/// Returns `OcrError::NoText` when the trimmed text is empty, or the engine's
/// own error.
pub async fn extract_text(engine: &dyn OcrEngine, image: &ReceiptImage) -> Result<String, OcrError> {
    let text = engine.recognize(image).await?;
    if text.trim().is_empty() {
        return Err(OcrError::NoText);
    }
    Ok(text)
}

/// [`OcrEngine`] backed by the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    language: String,
}

impl TesseractOcr {
    #[must_use]
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            binary: config.tesseract.clone(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    #[instrument(skip(self, image), fields(bytes = image.bytes().len(), mime = image.mime_type()))]
    async fn recognize(&self, image: &ReceiptImage) -> Result<String, OcrError> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| OcrError::Engine(format!("failed to start {}: {e}", self.binary.display())))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Engine("stdin not captured".to_string()))?;
        let bytes = image.bytes().to_vec();

        // Feed stdin concurrently so a full stdout pipe cannot deadlock us
        let writer = tokio::spawn(async move {
            stdin.write_all(&bytes).await?;
            stdin.shutdown().await
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| OcrError::Engine(e.to_string()))?;

        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!(error = %e, "tesseract closed stdin early"),
            Err(e) => return Err(OcrError::Engine(format!("stdin writer failed: {e}"))),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(chars = text.chars().count(), "OCR finished");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn recognize(&self, _image: &ReceiptImage) -> Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    fn image() -> ReceiptImage {
        ReceiptImage::new(vec![0x89, b'P', b'N', b'G'], "image/png")
    }

    #[tokio::test]
    async fn test_extract_text_passes_through() {
        let text = extract_text(&FixedOcr("MILK 2.99\nBREAD 3.49"), &image())
            .await
            .expect("text");
        assert_eq!(text, "MILK 2.99\nBREAD 3.49");
    }

    #[tokio::test]
    async fn test_whitespace_only_is_no_text() {
        let err = extract_text(&FixedOcr(" \n\t \n"), &image())
            .await
            .expect_err("blank");
        assert!(matches!(err, OcrError::NoText));
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_error() {
        let engine = TesseractOcr::new(&OcrConfig {
            tesseract: PathBuf::from("/nonexistent/chopchop-tesseract"),
            language: "eng".to_string(),
        });
        let err = engine.recognize(&image()).await.expect_err("no binary");
        assert!(matches!(err, OcrError::Engine(_)));
    }

    #[test]
    fn test_mime_type_for() {
        assert_eq!(mime_type_for(Path::new("r.PNG")), "image/png");
        assert_eq!(mime_type_for(Path::new("r.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("scan.tiff")), "image/tiff");
        assert_eq!(mime_type_for(Path::new("receipt")), "application/octet-stream");
    }

    #[test]
    fn test_debug_hides_bytes() {
        let debug_output = format!("{:?}", image());
        assert!(debug_output.contains("bytes: 4"));
    }
}
