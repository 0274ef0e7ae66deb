// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem bridge for desktop/CI use.
//
// `MirrorSource` reads scrambled pages from a local mirror directory instead of
// the network; `DirectorySink` writes exported pages into an output directory.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::DeliveryOutcome;

use crate::traits::{DownloadSink, ExportItem, PageSource};

/// Page source backed by a directory of already-downloaded page files.
///
/// A URL is resolved to `root/<last path segment>` (query and fragment are
/// ignored). `file://` URLs and existing absolute paths are read directly.
#[derive(Debug, Clone)]
pub struct MirrorSource {
    root: PathBuf,
}

impl MirrorSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Local path a URL maps to.
    pub fn resolve(&self, url: &str) -> Result<PathBuf> {
        if let Some(path) = url.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        let direct = Path::new(url);
        if direct.is_absolute() {
            return Ok(direct.to_path_buf());
        }

        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let name = without_query
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| PagewerkError::ImageLoad(format!("no file name in URL '{url}'")))?;
        Ok(self.root.join(name))
    }
}

impl PageSource for MirrorSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = self.resolve(url)?;
        debug!(url, path = %path.display(), "reading mirrored page");
        tokio::fs::read(&path)
            .await
            .map_err(|e| PagewerkError::ImageLoad(format!("{}: {e}", path.display())))
    }
}

/// Sink that writes every exported page into one directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    async fn deliver(&self, item: ExportItem<'_>) -> DeliveryOutcome {
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(dir = %self.dir.display(), error = %e, "cannot create output directory");
            return DeliveryOutcome::Failed(e.to_string());
        }

        let path = self.dir.join(item.filename);
        match tokio::fs::write(&path, item.bytes).await {
            Ok(()) => {
                debug!(path = %path.display(), mime = item.mime_type, "page written");
                DeliveryOutcome::Delivered
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "page write failed");
                DeliveryOutcome::Failed(e.to_string())
            }
        }
    }
}
