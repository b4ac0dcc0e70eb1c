//! Receipt scanning and the scan-or-skip choice.

use std::path::Path;
use std::sync::Arc;

use chopchop_core::{AppPage, PageEvent, describe_days_left};
use chopchop_scanner::ScanPipeline;
use chopchop_scanner::ocr::{ReceiptImage, TesseractOcr};

use crate::context::{Context, page_hint, say};
use crate::error::CliError;

pub async fn scan(ctx: &Context, image: &Path) -> Result<(), CliError> {
    let mut stored = ctx.restore().await?;

    // Scanning from the dashboard is the "add receipt" navigation
    if stored.page() == AppPage::Dashboard {
        ctx.navigate(&mut stored, PageEvent::AddReceipt)?;
    }

    let image = ReceiptImage::from_path(image)
        .await
        .map_err(chopchop_scanner::PipelineError::from)?;
    let pipeline = ScanPipeline::new(
        Arc::new(TesseractOcr::new(&ctx.config.ocr)),
        ctx.relay()?,
        ctx.supabase.clone(),
    );

    say("Scanning receipt...")?;
    let result = pipeline.scan(Some(&stored.session()), &image).await;

    // The user moves on to the dashboard whether or not the scan worked
    let page = ctx.navigate(&mut stored, PageEvent::ScanFinished)?;
    let report = result?;

    if report.items.is_empty() {
        say("No grocery items found on that receipt.")?;
    } else {
        say(format_args!("Added {} items to your fridge:", report.items.len()))?;
        for item in &report.items {
            say(format_args!(
                "  {} ({})",
                item.name,
                describe_days_left(i64::from(item.perish_days.get()))
            ))?;
        }
    }
    say(page_hint(page))
}

pub async fn skip(ctx: &Context) -> Result<(), CliError> {
    let mut stored = ctx.restore().await?;
    let page = ctx.navigate(&mut stored, PageEvent::SkipScan)?;
    say(page_hint(page))
}
