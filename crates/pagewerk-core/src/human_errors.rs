// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the progress display.
//
// Every technical error is mapped to a plain message with a suggestion. The
// presentation layer decides how to show it; cancellation is never shown.

use crate::error::PagewerkError;

/// Severity of an error from the reader's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Host hiccup; retrying the page is worthwhile.
    Transient,
    /// The reader must change something (pattern, profile, output dir).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
    /// Session teardown. Not a failure; never surfaced.
    Silent,
}

/// A human-readable error with a plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What the reader should try next.
    pub suggestion: String,
    /// Whether a manual retry of the same page makes sense.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PagewerkError` into a `HumanError`.
pub fn humanize_error(err: &PagewerkError) -> HumanError {
    match err {
        PagewerkError::DataExtraction(detail) => HumanError {
            message: "No pages could be found for this episode.".into(),
            suggestion: format!(
                "Check that the episode data is complete and that the page URLs match the \
                 configured pattern, then start again. ({detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::SourceTooSmall {
            width,
            height,
            required_width,
            required_height,
        } => HumanError {
            message: format!("This page is too small to restore ({width}x{height})."),
            suggestion: format!(
                "The scramble grid needs at least {required_width}x{required_height} pixels. \
                 The host may be serving a reduced-size variant."
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        PagewerkError::NonIntegerTileSize { .. } | PagewerkError::InvalidPermutation(_) => {
            HumanError {
                message: "The tile layout for this resolution is inconsistent.".into(),
                suggestion: "This resolution needs a different geometry profile.".into(),
                retriable: false,
                severity: Severity::Permanent,
            }
        }

        PagewerkError::ImageLoad(detail) => HumanError {
            message: "The scrambled page could not be loaded.".into(),
            suggestion: format!("Check the connection or the local mirror, then retry this page. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        PagewerkError::ImageError(_) => HumanError {
            message: "The page image could not be decoded or encoded.".into(),
            suggestion: "The downloaded file may be truncated. Retry the page.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PagewerkError::Export(detail) => HumanError {
            message: "The page could not be saved.".into(),
            suggestion: format!("Export it again. ({detail})"),
            retriable: true,
            severity: Severity::Transient,
        },

        PagewerkError::NoRestoredPages => HumanError {
            message: "There are no restored pages to save.".into(),
            suggestion: "Restore pages first, then export.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::PageNotFound(index) => HumanError {
            message: format!("Page {index} does not exist in this episode."),
            suggestion: "Pick a page from the list.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::PageNotRestored(index) => HumanError {
            message: format!("Page {index} has not been restored yet."),
            suggestion: "Restore the page before exporting it.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::InvalidTransition { index, .. } => HumanError {
            message: format!("Page {index} is busy or already restored."),
            suggestion: "Wait for the current operation to finish.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::Cancelled => HumanError {
            message: "Stopped.".into(),
            suggestion: String::new(),
            retriable: false,
            severity: Severity::Silent,
        },

        PagewerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Pagewerk doesn't have permission to write there.".into(),
                    suggestion: "Choose another output directory.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PagewerkError::Serialization(_) => HumanError {
            message: "A data file could not be read.".into(),
            suggestion: "Check the episode or config JSON for syntax errors.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
