// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Persisted session settings.
//
// Settings live as pretty-printed JSON. A missing file means defaults; a file
// that does not parse is reported and also falls back to defaults, so a bad
// edit never blocks a restore.

use std::path::Path;

use tracing::{debug, warn};

use pagewerk_core::SessionConfig;
use pagewerk_core::error::Result;

/// Load settings from `path`, falling back to defaults.
pub fn load_config(path: &Path) -> SessionConfig {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no settings file, using defaults");
            return SessionConfig::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "settings file is invalid, using defaults");
            SessionConfig::default()
        }
    }
}

/// Write settings to `path`, creating parent directories.
pub fn persist_config(path: &Path, config: &SessionConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}
