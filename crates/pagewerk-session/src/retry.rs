// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Error classification for failed pages.
//
// Classifies errors into Transient (a manual retry may succeed), Permanent
// (same geometry, same result) and Cancelled (session gone). The
// class decides whether a failed page is offered for retry.

use pagewerk_core::error::PagewerkError;
use pagewerk_core::types::{ErrorClass, FailureKind, PageFailure};

/// Classify a `PagewerkError` into an `ErrorClass`.
pub fn classify_error(err: &PagewerkError) -> ErrorClass {
    match err {
        PagewerkError::Cancelled => ErrorClass::Cancelled,

        // Transient: acquisition and delivery problems, truncated downloads
        PagewerkError::ImageLoad(_) => ErrorClass::Transient,
        PagewerkError::ImageError(_) => ErrorClass::Transient,
        PagewerkError::Export(_) => ErrorClass::Transient,

        // Permanent: geometry, bad input, programming errors
        PagewerkError::SourceTooSmall { .. } => ErrorClass::Permanent,
        PagewerkError::NonIntegerTileSize { .. } => ErrorClass::Permanent,
        PagewerkError::InvalidPermutation(_) => ErrorClass::Permanent,
        PagewerkError::DataExtraction(_) => ErrorClass::Permanent,
        PagewerkError::InvalidTransition { .. } => ErrorClass::Permanent,
        PagewerkError::PageNotFound(_) => ErrorClass::Permanent,
        PagewerkError::PageNotRestored(_) => ErrorClass::Permanent,
        PagewerkError::NoRestoredPages => ErrorClass::Permanent,
        PagewerkError::Serialization(_) => ErrorClass::Permanent,

        // IO errors depend on the kind
        PagewerkError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound
            | std::io::ErrorKind::PermissionDenied
            | std::io::ErrorKind::InvalidData => ErrorClass::Permanent,
            _ => ErrorClass::Transient,
        },
    }
}

/// Taxonomy tag recorded on the page for `err`.
pub fn failure_kind(err: &PagewerkError) -> FailureKind {
    match err {
        PagewerkError::SourceTooSmall { .. } => FailureKind::SourceTooSmall,
        PagewerkError::NonIntegerTileSize { .. } => FailureKind::NonIntegerTileSize,
        PagewerkError::ImageLoad(_) | PagewerkError::Io(_) => FailureKind::ImageLoad,
        PagewerkError::ImageError(_) => FailureKind::ImageCodec,
        PagewerkError::Cancelled => FailureKind::Cancelled,
        _ => FailureKind::Other,
    }
}

/// Build the `last_error` record for a page that failed with `err`.
pub fn failure_for(err: &PagewerkError) -> PageFailure {
    PageFailure {
        kind: failure_kind(err),
        message: err.to_string(),
        retryable: classify_error(err) == ErrorClass::Transient,
    }
}
