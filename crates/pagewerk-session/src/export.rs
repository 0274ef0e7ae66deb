// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export queue.
//
// Hands restored pages to the download sink one at a time, in ascending index
// order, with a pacing delay between dispatches. Each sink call is bounded by
// the configured timeout, so every dispatched page gets exactly one outcome.

use std::time::Duration;

use tracing::{info, instrument, warn};

use pagewerk_bridge::traits::{DownloadSink, ExportItem, PageObserver};
use pagewerk_core::config::SessionConfig;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{
    DeliveryOutcome, EXPORT_MIME_TYPE, ExportOutcome, ExportReport, export_file_name,
};

use crate::cancel::CancellationToken;
use crate::registry::PageRegistry;

/// Sequential, paced exporter for one session.
pub struct ExportQueue<K> {
    sink: K,
    cancel: CancellationToken,
    pacing: Duration,
    timeout: Duration,
}

impl<K: DownloadSink> ExportQueue<K> {
    pub fn new(sink: K, cancel: CancellationToken, config: &SessionConfig) -> Self {
        Self {
            sink,
            cancel,
            pacing: config.export_pacing(),
            timeout: config.export_timeout(),
        }
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Export one restored page.
    ///
    /// Sink failures and timeouts are returned inside the outcome; only
    /// precondition violations and teardown are errors.
    #[instrument(skip(self, registry, observer))]
    pub async fn export_page<O: PageObserver>(
        &self,
        registry: &PageRegistry,
        observer: &O,
        index: u32,
    ) -> Result<ExportOutcome> {
        self.cancel.check()?;

        let page = registry.page(index)?;
        let bytes = match (&page.restored_bytes, page.is_restored()) {
            (Some(bytes), true) => bytes.as_slice(),
            _ => return Err(PagewerkError::PageNotRestored(index)),
        };
        let filename = export_file_name(index, registry.len());

        let item = ExportItem {
            bytes,
            filename: &filename,
            mime_type: EXPORT_MIME_TYPE,
        };
        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => return Err(PagewerkError::Cancelled),
            delivered = tokio::time::timeout(self.timeout, self.sink.deliver(item)) => {
                delivered.unwrap_or(DeliveryOutcome::TimedOut)
            }
        };

        match &outcome {
            DeliveryOutcome::Delivered => info!(page = index, file = %filename, "page exported"),
            DeliveryOutcome::Failed(reason) => {
                warn!(page = index, file = %filename, reason = %reason, "export failed")
            }
            DeliveryOutcome::TimedOut => warn!(
                page = index,
                file = %filename,
                timeout_ms = self.timeout.as_millis() as u64,
                "export timed out"
            ),
        }

        let outcome = ExportOutcome {
            index,
            filename,
            outcome,
        };
        observer.export_attempted(&outcome);
        Ok(outcome)
    }

    /// Export every restored page, ascending, pacing between dispatches.
    ///
    /// Fails with `Cancelled` after teardown and with `NoRestoredPages` when
    /// there is nothing to export.
    /// Teardown stops the batch; the items already dispatched are kept.
    #[instrument(skip_all, fields(pages = registry.len()))]
    pub async fn export_all<O: PageObserver>(
        &self,
        registry: &PageRegistry,
        observer: &O,
    ) -> Result<ExportReport> {
        self.cancel.check()?;
        let indices = registry.restored_indices();
        if indices.is_empty() {
            return Err(PagewerkError::NoRestoredPages);
        }

        let mut report = ExportReport::default();
        for (position, index) in indices.into_iter().enumerate() {
            if position > 0 && self.cancel.sleep(self.pacing).await.is_err() {
                report.cancelled = true;
                break;
            }
            match self.export_page(registry, observer, index).await {
                Ok(outcome) => report.items.push(outcome),
                Err(err) if err.is_cancelled() => {
                    report.cancelled = true;
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            delivered = report.delivered(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "export batch finished"
        );
        observer.export_finished(&report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewerk_core::types::PageRecord;

    use crate::testing::{MemorySink, RecordingObserver, page_url};

    fn config() -> SessionConfig {
        SessionConfig {
            export_pacing_ms: 0,
            export_timeout_ms: 50,
            ..Default::default()
        }
    }

    /// Registry of `total` pages with `restored` marked as restored.
    fn registry(total: u32, restored: &[u32]) -> PageRegistry {
        let records = (1..=total)
            .map(|index| PageRecord {
                source_url: page_url(index),
                index,
            })
            .collect();
        let mut reg = PageRegistry::from_records(records).expect("seed");
        for &index in restored {
            reg.begin_restore(index).expect("begin");
            reg.complete_restore(index, vec![0xFF, 0xD8, index as u8])
                .expect("complete");
        }
        reg
    }

    #[tokio::test]
    async fn exports_restored_pages_with_padded_names() {
        let queue = ExportQueue::new(MemorySink::default(), CancellationToken::new(), &config());
        let reg = registry(12, &[1, 2, 10]);
        let observer = RecordingObserver::default();

        let report = queue.export_all(&reg, &observer).await.expect("export");

        assert_eq!(report.delivered(), 3);
        assert_eq!(
            queue.sink().delivered_names(),
            vec!["01.jpg", "02.jpg", "10.jpg"]
        );
        let delivered = queue.sink().delivered.lock().expect("lock").clone();
        assert!(delivered.iter().all(|(_, _, mime)| mime == "image/jpeg"));
        assert_eq!(observer.exports.lock().expect("lock").len(), 3);
    }

    #[tokio::test]
    async fn nothing_restored_is_a_precondition_error() {
        let queue = ExportQueue::new(MemorySink::default(), CancellationToken::new(), &config());
        let reg = registry(3, &[]);
        let err = queue
            .export_all(&reg, &RecordingObserver::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PagewerkError::NoRestoredPages));
    }

    #[tokio::test]
    async fn unrestored_page_cannot_be_exported() {
        let queue = ExportQueue::new(MemorySink::default(), CancellationToken::new(), &config());
        let reg = registry(3, &[1]);
        let observer = RecordingObserver::default();

        assert!(matches!(
            queue.export_page(&reg, &observer, 2).await,
            Err(PagewerkError::PageNotRestored(2))
        ));
        assert!(matches!(
            queue.export_page(&reg, &observer, 9).await,
            Err(PagewerkError::PageNotFound(9))
        ));
    }

    #[tokio::test]
    async fn sink_failure_is_reported_per_item() {
        let sink = MemorySink::default().failing_on("2.jpg");
        let queue = ExportQueue::new(sink, CancellationToken::new(), &config());
        let reg = registry(3, &[1, 2, 3]);

        let report = queue
            .export_all(&reg, &RecordingObserver::default())
            .await
            .expect("export");

        assert_eq!(report.items.len(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.items[1].outcome,
            DeliveryOutcome::Failed("disk full".into())
        );
        assert_eq!(queue.sink().delivered_names(), vec!["1.jpg", "3.jpg"]);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_sink_times_out_for_that_item_only() {
        let sink = MemorySink::default().hanging_on("2.jpg");
        let queue = ExportQueue::new(sink, CancellationToken::new(), &config());
        let reg = registry(3, &[1, 2, 3]);

        let report = queue
            .export_all(&reg, &RecordingObserver::default())
            .await
            .expect("export");

        let outcomes: Vec<_> = report.items.iter().map(|i| i.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                DeliveryOutcome::Delivered,
                DeliveryOutcome::TimedOut,
                DeliveryOutcome::Delivered
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_during_pacing_stops_the_batch() {
        let cancel = CancellationToken::new();
        let config = SessionConfig {
            export_pacing_ms: 500,
            ..Default::default()
        };
        let queue = ExportQueue::new(MemorySink::default(), cancel.clone(), &config);
        let reg = registry(3, &[1, 2, 3]);

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let report = queue
            .export_all(&reg, &RecordingObserver::default())
            .await
            .expect("export");
        assert!(report.cancelled);
        assert_eq!(report.items.len(), 1);
        assert_eq!(queue.sink().delivered_names(), vec!["1.jpg"]);
    }
}
