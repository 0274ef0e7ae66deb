// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagewerk.

use thiserror::Error;

use crate::types::PageStatus;

/// Top-level error type for all Pagewerk operations.
#[derive(Debug, Error)]
pub enum PagewerkError {
    // -- Session setup --
    #[error("page data extraction failed: {0}")]
    DataExtraction(String),

    // -- Geometry --
    #[error(
        "source image ({width}x{height}px) is smaller than the required \
         {required_width}x{required_height}px"
    )]
    SourceTooSmall {
        width: u32,
        height: u32,
        required_width: u32,
        required_height: u32,
    },

    #[error("tile rectangle {rect_width}x{rect_height}px does not divide into a {rows}x{cols} grid")]
    NonIntegerTileSize {
        rect_width: u32,
        rect_height: u32,
        rows: u32,
        cols: u32,
    },

    #[error("invalid tile permutation: {0}")]
    InvalidPermutation(String),

    // -- Image acquisition / codec --
    #[error("failed to load source image: {0}")]
    ImageLoad(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Export --
    #[error("export failed: {0}")]
    Export(String),

    #[error("no restored pages to export")]
    NoRestoredPages,

    // -- Registry --
    #[error("page {0} not found")]
    PageNotFound(u32),

    #[error("page {0} has not been restored")]
    PageNotRestored(u32),

    #[error("page {index}: transition {from:?} -> {to:?} is not allowed")]
    InvalidTransition {
        index: u32,
        from: PageStatus,
        to: PageStatus,
    },

    // -- Session lifecycle --
    #[error("session was torn down")]
    Cancelled,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PagewerkError {
    /// Whether this error is the cooperative-cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagewerkError>;
