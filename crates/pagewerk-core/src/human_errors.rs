// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for front ends.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives presentation; `retriable` tells the front end whether
// offering the same action again makes sense.

use crate::error::PagewerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something outside the document got in the way (disk, a concurrent edit).
    Transient,
    /// The user must change what they asked for.
    ActionRequired,
    /// The input document itself cannot be handled.
    Permanent,
    /// The editor's own state is inconsistent; the document must be reopened.
    Defect,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether repeating the same action may succeed.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Convert a `PagewerkError` into a `HumanError`.
pub fn humanize_error(err: &PagewerkError) -> HumanError {
    match err {
        // -- Caller input --
        PagewerkError::Validation(detail) => HumanError {
            message: "That edit can't be applied.".into(),
            suggestion: format!("Check the pages you picked and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::InvalidRange {
            start,
            end,
            page_count,
        } => HumanError {
            message: "Those page numbers don't fit this document.".into(),
            suggestion: format!(
                "Pick a range between 1 and {page_count} where the first page is not after the last (you asked for {start} to {end})."
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::CannotDeleteAll => HumanError {
            message: "A document needs at least one page.".into(),
            suggestion: "Leave at least one page unselected before deleting.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagewerkError::InsufficientInputs(count) => HumanError {
            message: "Pick at least two documents to merge.".into(),
            suggestion: format!("Only {count} document(s) were chosen."),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Internal state --
        PagewerkError::StateCorruption(_) => HumanError {
            message: "The editor lost track of your pages.".into(),
            suggestion: "Download what you have if you can, then open the document again. Please report this.".into(),
            retriable: false,
            severity: Severity::Defect,
        },

        PagewerkError::Superseded => HumanError {
            message: "The document changed while that edit was running.".into(),
            suggestion: "Apply the edit again on the current version.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Codec --
        PagewerkError::SourceUnreadable(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged or not a PDF. Try opening it in another viewer first to check it works.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PagewerkError::EncryptedSource => HumanError {
            message: "This PDF is password protected.".into(),
            suggestion: "Remove the protection in another tool, then open the unprotected copy here.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PagewerkError::Codec { operation, .. } => HumanError {
            message: "The document couldn't be rebuilt.".into(),
            suggestion: format!("Something in this PDF stopped the editor while it tried to {operation}. Try a different file."),
            retriable: false,
            severity: Severity::Permanent,
        },

        PagewerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        // -- Storage --
        PagewerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Pagewerk doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PagewerkError::Serialization(_) => HumanError {
            message: "A settings or script file couldn't be read.".into(),
            suggestion: "Check the file is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
