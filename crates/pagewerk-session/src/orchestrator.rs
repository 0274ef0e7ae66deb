// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Restoration orchestrator.
//
// Drives pages through `Pending -> Restoring -> Restored | Failed`, one at a
// time and in ascending index order. Every suspension point (fetch, the
// blocking descramble, the pacing delay) is followed by a liveness check, so
// a torn-down session stops at the next boundary and never reports a
// cancelled page as restored.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use pagewerk_bridge::traits::{PageObserver, PageSource};
use pagewerk_core::config::SessionConfig;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{BatchReport, PageStatus};
use pagewerk_image::TileDescrambler;

use crate::cancel::CancellationToken;
use crate::registry::PageRegistry;
use crate::retry::failure_for;

/// Sequences page restoration for one session.
pub struct RestorationOrchestrator<S> {
    source: S,
    descrambler: Arc<TileDescrambler>,
    cancel: CancellationToken,
    pacing: Duration,
    jpeg_quality: u8,
}

impl<S: PageSource> RestorationOrchestrator<S> {
    pub fn new(
        source: S,
        descrambler: Arc<TileDescrambler>,
        cancel: CancellationToken,
        config: &SessionConfig,
    ) -> Self {
        Self {
            source,
            descrambler,
            cancel,
            pacing: config.restore_pacing(),
            jpeg_quality: config.jpeg_quality,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Restore a single page.
    ///
    /// A cleared token before the attempt leaves the page untouched. Once the
    /// page is `Restoring`, every failure (cancellation included) lands it in
    /// `Failed` and is returned to the caller.
    #[instrument(skip(self, registry, observer))]
    pub async fn restore_page<O: PageObserver>(
        &self,
        registry: &mut PageRegistry,
        observer: &O,
        index: u32,
    ) -> Result<()> {
        self.cancel.check()?;

        let url = {
            let page = registry.begin_restore(index)?;
            observer.page_changed(page);
            page.source_url.clone()
        };

        match self.attempt(&url).await {
            Ok(bytes) => {
                let page = registry.complete_restore(index, bytes)?;
                observer.page_changed(page);
                Ok(())
            }
            Err(err) => {
                if err.is_cancelled() {
                    debug!(page = index, "restore interrupted by teardown");
                } else {
                    warn!(page = index, error = %err, "restore failed");
                }
                let page = registry.fail_restore(index, failure_for(&err))?;
                observer.page_changed(page);
                Err(err)
            }
        }
    }

    /// Fetch, descramble and encode one page, checking liveness after every
    /// suspension.
    async fn attempt(&self, url: &str) -> Result<Vec<u8>> {
        let fetched = tokio::select! {
            _ = self.cancel.cancelled() => return Err(PagewerkError::Cancelled),
            fetched = self.source.fetch(url) => fetched?,
        };
        self.cancel.check()?;

        let descrambler = Arc::clone(&self.descrambler);
        let quality = self.jpeg_quality;
        let restored =
            tokio::task::spawn_blocking(move || descrambler.restore_bytes(&fetched, quality))
                .await
                .map_err(|e| PagewerkError::ImageError(format!("restore task failed: {e}")))??;
        self.cancel.check()?;

        debug!(
            width = restored.width,
            height = restored.height,
            bytes = restored.bytes.len(),
            "page decoded and reassembled"
        );
        Ok(restored.bytes)
    }

    /// Restore every page that is not restored yet, in ascending order.
    ///
    /// Per-page failures are recorded and the batch moves on. Teardown stops
    /// the batch at the next boundary and is reported through
    /// `BatchReport::cancelled`, never as an error.
    #[instrument(skip_all, fields(pages = registry.len()))]
    pub async fn restore_all<O: PageObserver>(
        &self,
        registry: &mut PageRegistry,
        observer: &O,
    ) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for index in registry.indices() {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            if registry.page(index)?.is_restored() {
                report.skipped += 1;
                continue;
            }

            if report.attempted > 0 && self.cancel.sleep(self.pacing).await.is_err() {
                report.cancelled = true;
                break;
            }

            report.attempted += 1;
            match self.restore_page(registry, observer, index).await {
                Ok(()) => report.succeeded += 1,
                Err(err) if err.is_cancelled() => {
                    if registry.page(index)?.status == PageStatus::Failed {
                        report.interrupted = Some(index);
                    }
                    report.cancelled = true;
                    break;
                }
                Err(_) => report.failed += 1,
            }
        }

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            cancelled = report.cancelled,
            interrupted = ?report.interrupted,
            "restore batch finished"
        );
        observer.restore_finished(&report);
        Ok(report)
    }
}
