// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory page registry for one restore session.
//
// The registry holds every page of an episode in index order, together with
// its restoration state and restored bytes. It lives exactly as long as the
// session; teardown drops every page at once. State changes go through the
// crate-private transition methods so that only the orchestrator can move a
// page through its lifecycle.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{Page, PageFailure, PageRecord, PageStatus};

/// Read-only view of a page for observers (no pixel data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSnapshot {
    pub index: u32,
    pub source_url: String,
    pub status: PageStatus,
    pub last_error: Option<PageFailure>,
    pub attempts: u32,
    pub restored_len: Option<usize>,
}

/// Per-status page counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub restoring: usize,
    pub restored: usize,
    pub failed: usize,
}

/// Ordered collection of the session's pages.
#[derive(Debug, Default)]
pub struct PageRegistry {
    /// Insertion order == index order; `pages[i].index == i + 1`.
    pages: Vec<Page>,
}

impl PageRegistry {
    /// Seed the registry from extracted records.
    ///
    /// Records must be non-empty and numbered 1..N without gaps; anything else
    /// is an extraction error and no page is created.
    #[instrument(skip_all, fields(count = records.len()))]
    pub fn from_records(mut records: Vec<PageRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(PagewerkError::DataExtraction(
                "no qualifying page records".into(),
            ));
        }

        records.sort_by_key(|r| r.index);
        for (position, record) in records.iter().enumerate() {
            let expected = position as u32 + 1;
            if record.index != expected {
                return Err(PagewerkError::DataExtraction(format!(
                    "page indices must run 1..{} without gaps (found {} at position {expected})",
                    records.len(),
                    record.index
                )));
            }
        }

        let pages: Vec<Page> = records.into_iter().map(Page::new).collect();
        info!(pages = pages.len(), "page registry seeded");
        Ok(Self { pages })
    }

    /// Number of pages in the episode (drives export file-name padding).
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in ascending index order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Look up a page by its 1-based index.
    pub fn get(&self, index: u32) -> Option<&Page> {
        let position = index.checked_sub(1)? as usize;
        self.pages.get(position).filter(|p| p.index == index)
    }

    /// Like [`get`](Self::get), but a missing page is an error.
    pub fn page(&self, index: u32) -> Result<&Page> {
        self.get(index).ok_or(PagewerkError::PageNotFound(index))
    }

    /// Indices of every page, ascending.
    pub fn indices(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.index).collect()
    }

    /// Indices of restored pages, ascending.
    pub fn restored_indices(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| p.is_restored())
            .map(|p| p.index)
            .collect()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for page in &self.pages {
            match page.status {
                PageStatus::Pending => counts.pending += 1,
                PageStatus::Restoring => counts.restoring += 1,
                PageStatus::Restored => counts.restored += 1,
                PageStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Cheap copy of the registry state for presentation.
    pub fn snapshot(&self) -> Vec<PageSnapshot> {
        self.pages
            .iter()
            .map(|p| PageSnapshot {
                index: p.index,
                source_url: p.source_url.clone(),
                status: p.status,
                last_error: p.last_error.clone(),
                attempts: p.attempts,
                restored_len: p.restored_bytes.as_ref().map(Vec::len),
            })
            .collect()
    }

    /// Drop every page. The registry is unusable for the rest of the session.
    pub fn teardown(&mut self) {
        info!(pages = self.pages.len(), "page registry torn down");
        self.pages.clear();
    }

    // -- Transitions (orchestrator only) --------------------------------------

    /// `Pending | Failed -> Restoring`. Clears the previous error.
    pub(crate) fn begin_restore(&mut self, index: u32) -> Result<&Page> {
        let page = self.transition(index, PageStatus::Restoring)?;
        page.attempts += 1;
        page.last_error = None;
        Ok(page)
    }

    /// `Restoring -> Restored` with the encoded page bytes.
    pub(crate) fn complete_restore(&mut self, index: u32, bytes: Vec<u8>) -> Result<&Page> {
        let page = self.transition(index, PageStatus::Restored)?;
        page.restored_bytes = Some(bytes);
        page.last_error = None;
        Ok(page)
    }

    /// `Restoring -> Failed` with the reason.
    pub(crate) fn fail_restore(&mut self, index: u32, failure: PageFailure) -> Result<&Page> {
        let page = self.transition(index, PageStatus::Failed)?;
        page.restored_bytes = None;
        page.last_error = Some(failure);
        Ok(page)
    }

    fn transition(&mut self, index: u32, to: PageStatus) -> Result<&mut Page> {
        let position = index
            .checked_sub(1)
            .map(|p| p as usize)
            .filter(|&p| self.pages.get(p).is_some_and(|page| page.index == index))
            .ok_or(PagewerkError::PageNotFound(index))?;
        let page = &mut self.pages[position];

        if !page.status.can_transition_to(to) {
            return Err(PagewerkError::InvalidTransition {
                index,
                from: page.status,
                to,
            });
        }

        debug!(page = index, from = ?page.status, ?to, "page transition");
        page.status = to;
        page.updated_at = Utc::now();
        Ok(page)
    }
}
