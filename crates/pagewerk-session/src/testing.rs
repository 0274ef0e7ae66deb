// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory collaborators shared by the session tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};

use pagewerk_bridge::traits::{DownloadSink, ExportItem, PageObserver, PageSource};
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{DeliveryOutcome, ExportOutcome, Page, PageRecord, PageStatus};
use pagewerk_image::{ProfileResolver, ResolutionProfile, TilePermutation, TileDescrambler};

use crate::cancel::CancellationToken;

/// Page size the small test descrambler expects (32x48 rectangle + margins).
pub const PAGE_WIDTH: u32 = 40;
pub const PAGE_HEIGHT: u32 = 52;

pub fn page_url(index: u32) -> String {
    format!("https://cdn.example.com/public/page/{index}.png")
}

pub fn records(n: u32) -> Vec<PageRecord> {
    (1..=n)
        .map(|index| PageRecord {
            source_url: page_url(index),
            index,
        })
        .collect()
}

/// Descrambler whose fallback profile fits [`PAGE_WIDTH`] x [`PAGE_HEIGHT`].
pub fn small_descrambler() -> Arc<TileDescrambler> {
    let permutation = TilePermutation::standard().expect("standard permutation");
    let resolver = ProfileResolver::new(Vec::new(), ResolutionProfile::at_origin(32, 48));
    Arc::new(TileDescrambler::new(permutation, resolver))
}

pub fn png_page(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 5) as u8, (y * 3) as u8, 40]));
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png)
        .expect("encode png");
    buf.into_inner()
}

// -- Source ------------------------------------------------------------------

/// Serves pages from memory. Unknown URLs fail like a network error.
#[derive(Default)]
pub struct MemorySource {
    pages: HashMap<String, Vec<u8>>,
    /// URL whose fetch clears the token and then never completes.
    hang: Option<(String, CancellationToken)>,
}

impl MemorySource {
    /// `n` valid pages, with `broken` indices served as undersized images.
    pub fn with_pages(n: u32, broken: &[u32]) -> Self {
        let mut pages = HashMap::new();
        for index in 1..=n {
            let bytes = if broken.contains(&index) {
                png_page(16, 16)
            } else {
                png_page(PAGE_WIDTH, PAGE_HEIGHT)
            };
            pages.insert(page_url(index), bytes);
        }
        Self { pages, hang: None }
    }

    pub fn without(mut self, index: u32) -> Self {
        self.pages.remove(&page_url(index));
        self
    }

    pub fn cancelling_on(mut self, index: u32, token: CancellationToken) -> Self {
        self.hang = Some((page_url(index), token));
        self
    }
}

impl PageSource for MemorySource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some((hang_url, token)) = &self.hang {
            if hang_url == url {
                token.cancel();
                std::future::pending::<()>().await;
            }
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| PagewerkError::ImageLoad(format!("404 for {url}")))
    }
}

// -- Sink --------------------------------------------------------------------

/// Records delivered file names; can be told to fail or hang per file.
#[derive(Default)]
pub struct MemorySink {
    pub delivered: Mutex<Vec<(String, usize, String)>>,
    pub failing: HashSet<String>,
    pub hanging: HashSet<String>,
}

impl MemorySink {
    pub fn failing_on(mut self, filename: &str) -> Self {
        self.failing.insert(filename.to_string());
        self
    }

    pub fn hanging_on(mut self, filename: &str) -> Self {
        self.hanging.insert(filename.to_string());
        self
    }

    pub fn delivered_names(&self) -> Vec<String> {
        self.delivered
            .lock()
            .expect("sink lock")
            .iter()
            .map(|(name, _, _)| name.clone())
            .collect()
    }
}

impl DownloadSink for MemorySink {
    async fn deliver(&self, item: ExportItem<'_>) -> DeliveryOutcome {
        if self.hanging.contains(item.filename) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(item.filename) {
            return DeliveryOutcome::Failed("disk full".into());
        }
        self.delivered.lock().expect("sink lock").push((
            item.filename.to_string(),
            item.bytes.len(),
            item.mime_type.to_string(),
        ));
        DeliveryOutcome::Delivered
    }
}

// -- Observer ----------------------------------------------------------------

#[derive(Default)]
pub struct RecordingObserver {
    pub transitions: Mutex<Vec<(u32, PageStatus)>>,
    pub exports: Mutex<Vec<ExportOutcome>>,
}

impl RecordingObserver {
    pub fn transitions(&self) -> Vec<(u32, PageStatus)> {
        self.transitions.lock().expect("observer lock").clone()
    }
}

impl PageObserver for RecordingObserver {
    fn page_changed(&self, page: &Page) {
        self.transitions
            .lock()
            .expect("observer lock")
            .push((page.index, page.status));
    }

    fn export_attempted(&self, outcome: &ExportOutcome) {
        self.exports
            .lock()
            .expect("observer lock")
            .push(outcome.clone());
    }
}
