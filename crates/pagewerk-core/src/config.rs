// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Persistent settings for a restore/export session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between pages of a batch restore, in milliseconds.
    pub restore_pacing_ms: u64,
    /// Delay between dispatches of a batch export, in milliseconds.
    pub export_pacing_ms: u64,
    /// Upper bound on a single sink delivery, in milliseconds.
    pub export_timeout_ms: u64,
    /// JPEG quality (1-100) of restored pages.
    pub jpeg_quality: u8,
    /// Regex a page URL must match to count as a scrambled page asset.
    pub page_url_pattern: String,
    /// Where exported pages are written. `None` means the data directory.
    pub output_dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn restore_pacing(&self) -> Duration {
        Duration::from_millis(self.restore_pacing_ms)
    }

    pub fn export_pacing(&self) -> Duration {
        Duration::from_millis(self.export_pacing_ms)
    }

    pub fn export_timeout(&self) -> Duration {
        Duration::from_millis(self.export_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restore_pacing_ms: 300,
            export_pacing_ms: 500,
            export_timeout_ms: 30_000,
            jpeg_quality: 95,
            page_url_pattern: r"/public/page/".into(),
            output_dir: None,
        }
    }
}
