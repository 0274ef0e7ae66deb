// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for the collaborators around the restore pipeline.
//
// Fetching scrambled pages, persisting exported pages, and showing progress
// all live outside the core. The session only talks to them through these
// traits, so hosts can plug in an HTTP client, a browser download API, or a
// GUI without touching the pipeline.

use std::future::Future;

use pagewerk_core::error::Result;
use pagewerk_core::types::{BatchReport, DeliveryOutcome, ExportOutcome, ExportReport, Page};

/// Turns a page URL into the encoded bytes of the scrambled image.
pub trait PageSource {
    /// Fetch the scrambled page at `url`.
    ///
    /// Failures should be reported as `PagewerkError::ImageLoad`; they are
    /// recorded on the page and leave it retryable.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// One restored page handed to a sink.
#[derive(Debug, Clone, Copy)]
pub struct ExportItem<'a> {
    pub bytes: &'a [u8],
    pub filename: &'a str,
    pub mime_type: &'a str,
}

/// Persists exported pages.
pub trait DownloadSink {
    /// Deliver one item. The returned outcome is the single
    /// success / error / timeout report for it.
    fn deliver(&self, item: ExportItem<'_>) -> impl Future<Output = DeliveryOutcome> + Send;
}

/// Read-only progress listener.
///
/// Called after every page transition and export attempt. Implementations
/// must not block; they run on the session's control flow.
pub trait PageObserver {
    /// A page changed state. `page` is a view of the registry entry.
    fn page_changed(&self, _page: &Page) {}

    /// An export attempt finished (in any outcome).
    fn export_attempted(&self, _outcome: &ExportOutcome) {}

    /// A batch restore ran to completion or was cancelled.
    fn restore_finished(&self, _report: &BatchReport) {}

    /// A batch export ran to completion or was cancelled.
    fn export_finished(&self, _report: &ExportReport) {}
}
