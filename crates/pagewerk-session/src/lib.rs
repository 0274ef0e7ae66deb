// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk Session — page registry, paced restoration, and export queue.
// This crate sequences the descrambler from `pagewerk-image` over a whole
// episode and talks to the outside world only through `pagewerk-bridge`.

pub mod cancel;
pub mod export;
pub mod extract;
pub mod orchestrator;
pub mod registry;
pub mod retry;
pub mod session;

#[cfg(test)]
mod testing;

pub use cancel::CancellationToken;
pub use export::ExportQueue;
pub use extract::PageExtractor;
pub use orchestrator::RestorationOrchestrator;
pub use registry::{PageRegistry, PageSnapshot, StatusCounts};
pub use session::Session;
