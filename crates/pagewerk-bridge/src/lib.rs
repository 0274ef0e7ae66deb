// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — collaborator seams around the restore pipeline.
//
// Defines the traits the session uses to fetch scrambled pages, persist
// exported pages, and report progress, plus filesystem and tracing
// implementations for headless runs.

pub mod fs;
pub mod observer;
pub mod traits;

pub use fs::{DirectorySink, MirrorSource};
pub use observer::TracingObserver;
pub use traits::{DownloadSink, ExportItem, PageObserver, PageSource};
