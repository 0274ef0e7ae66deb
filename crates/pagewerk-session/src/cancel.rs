// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session-scoped cancellation token.
//
// Cleared once when the session is torn down. Clones share the same flag, so
// the CLI can hand one to its Ctrl-C handler while the orchestrator polls the
// other. Waiters are woken through a `Notify`, which lets pacing delays and
// in-flight fetches be interrupted immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tracing::debug;

use pagewerk_core::error::{PagewerkError, Result};

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared liveness flag for one session.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session as gone and wake every waiter. Idempotent.
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            debug!("cancellation requested");
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once the token has been cleared.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(PagewerkError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves once the token is cancelled (immediately if it already is).
    pub async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        // Register before reading the flag so a concurrent `cancel` is not lost.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }

    /// Sleep for `duration`, returning early with `Err(Cancelled)` on teardown.
    pub async fn sleep(&self, duration: Duration) -> Result<()> {
        self.check()?;
        if duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = self.cancelled() => Err(PagewerkError::Cancelled),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
