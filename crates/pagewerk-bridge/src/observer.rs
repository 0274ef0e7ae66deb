// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress observer that reports through `tracing`.
//
// Stands in for a presentation layer in headless runs: each transition and
// export attempt becomes one log line.

use tracing::{info, warn};

use pagewerk_core::human_errors::{Severity, humanize_error};
use pagewerk_core::types::{
    BatchReport, DeliveryOutcome, ExportOutcome, ExportReport, FailureKind, Page, PageStatus,
};

use crate::traits::PageObserver;

/// Logs page progress at `info`, failures at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PageObserver for TracingObserver {
    fn page_changed(&self, page: &Page) {
        match (page.status, &page.last_error) {
            (PageStatus::Failed, Some(failure)) if failure.kind == FailureKind::Cancelled => {}
            (PageStatus::Failed, Some(failure)) => warn!(
                page = page.index,
                retryable = failure.retryable,
                "page failed: {}",
                failure.message
            ),
            (status, _) => info!(page = page.index, ?status, "page updated"),
        }
    }

    fn export_attempted(&self, outcome: &ExportOutcome) {
        match outcome.outcome.to_error() {
            None => info!(page = outcome.index, file = %outcome.filename, "page exported"),
            Some(err) => warn!(
                page = outcome.index,
                file = %outcome.filename,
                timed_out = outcome.outcome == DeliveryOutcome::TimedOut,
                "{err}"
            ),
        }
    }

    fn restore_finished(&self, report: &BatchReport) {
        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            cancelled = report.cancelled,
            "restore batch finished"
        );
    }

    fn export_finished(&self, report: &ExportReport) {
        info!(
            delivered = report.delivered(),
            failed = report.failed(),
            cancelled = report.cancelled,
            "export batch finished"
        );
    }
}

/// Print a user-facing line for a session-level error, unless it is a
/// cancellation.
pub fn report_error(err: &pagewerk_core::PagewerkError) {
    let human = humanize_error(err);
    if human.severity == Severity::Silent {
        return;
    }
    warn!(retriable = human.retriable, "{} {}", human.message, human.suggestion);
}
