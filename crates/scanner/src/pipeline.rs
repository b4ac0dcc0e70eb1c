//! The receipt scan pipeline.
//!
//! OCR → item extraction → normalization → inventory write, strictly in
//! sequence. Any stage failure aborts the run; nothing is retried and
//! nothing is partially committed.

use std::sync::Arc;

use chopchop_core::{CandidateItem, NewInventoryRow};
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::bridge::{self, CompletionBackend};
use crate::error::PipelineError;
use crate::inventory::InventoryWriter;
use crate::normalize;
use crate::ocr::{self, OcrEngine, ReceiptImage};
use crate::store::{InventoryStore, Session};

/// Outcome of a successful scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Items as normalized from the model's reply.
    pub items: Vec<CandidateItem>,
    /// Rows written to the fridge.
    pub rows: Vec<NewInventoryRow>,
}

/// Wires the scan stages together.
#[derive(Clone)]
pub struct ScanPipeline {
    ocr: Arc<dyn OcrEngine>,
    backend: Arc<dyn CompletionBackend>,
    writer: InventoryWriter,
}

impl std::fmt::Debug for ScanPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanPipeline").finish_non_exhaustive()
    }
}

impl ScanPipeline {
    #[must_use]
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        backend: Arc<dyn CompletionBackend>,
        store: Arc<dyn InventoryStore>,
    ) -> Self {
        Self {
            ocr,
            backend,
            writer: InventoryWriter::new(store),
        }
    }

    /// Scan a receipt and add its items to the session user's fridge.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] of the first stage that fails.
    pub async fn scan(
        &self,
        session: Option<&Session>,
        image: &ReceiptImage,
    ) -> Result<ScanReport, PipelineError> {
        self.scan_at(session, image, Utc::now()).await
    }

    /// [`scan`](Self::scan) with an explicit clock reading for the row
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns the [`PipelineError`] of the first stage that fails.
    #[instrument(skip_all, fields(image = ?image))]
    pub async fn scan_at(
        &self,
        session: Option<&Session>,
        image: &ReceiptImage,
        now: DateTime<Utc>,
    ) -> Result<ScanReport, PipelineError> {
        // Fail before spending an OCR pass and a model call on a run that
        // cannot be saved
        if session.is_none() {
            tracing::warn!("Scan started without a session");
            return Err(PipelineError::NoAuthenticatedUser);
        }

        let text = ocr::extract_text(self.ocr.as_ref(), image).await.map_err(|e| {
            tracing::error!(error = %e, "OCR failed");
            PipelineError::from(e)
        })?;
        tracing::debug!(chars = text.chars().count(), "Extracted receipt text");

        let reply = bridge::request_receipt_items(self.backend.as_ref(), &text)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Item extraction failed");
                PipelineError::from(e)
            })?;

        let items = normalize::parse_items(&reply).map_err(|e| {
            tracing::error!(reason = %e.reason, "Model reply was not an item list");
            PipelineError::from(e)
        })?;
        tracing::info!(items = items.len(), "Extracted items from receipt");

        let rows = self.writer.write(session, &items, now).await?;

        Ok(ScanReport { items, rows })
    }
}
