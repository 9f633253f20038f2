// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pagewerk.

use thiserror::Error;

/// Top-level error type for all Pagewerk operations.
#[derive(Debug, Error)]
pub enum PagewerkError {
    // -- Caller input --
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("page range {start}..={end} is invalid for a {page_count} page document")]
    InvalidRange {
        start: u32,
        end: u32,
        page_count: usize,
    },

    #[error("cannot delete every page of the document")]
    CannotDeleteAll,

    #[error("merge needs at least two documents, got {0}")]
    InsufficientInputs(usize),

    // -- Internal state --
    #[error("edit state is corrupt: {0}")]
    StateCorruption(String),

    #[error("the session changed while the edit was in flight")]
    Superseded,

    // -- Codec --
    #[error("document could not be read: {0}")]
    SourceUnreadable(String),

    #[error("encrypted documents cannot be edited")]
    EncryptedSource,

    #[error("{operation} failed: {cause}")]
    Codec {
        operation: &'static str,
        cause: String,
    },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`PagewerkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    CannotDeleteAll,
    InsufficientInputs,
    StateCorruption,
    Superseded,
    SourceUnreadable,
    Codec,
    Io,
}

impl PagewerkError {
    /// Shorthand for a codec failure in `operation`.
    pub fn codec(operation: &'static str, cause: impl std::fmt::Display) -> Self {
        Self::Codec {
            operation,
            cause: cause.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidRange { .. } | Self::ImageError(_) => {
                ErrorKind::Validation
            }
            Self::CannotDeleteAll => ErrorKind::CannotDeleteAll,
            Self::InsufficientInputs(_) => ErrorKind::InsufficientInputs,
            Self::StateCorruption(_) => ErrorKind::StateCorruption,
            Self::Superseded => ErrorKind::Superseded,
            Self::SourceUnreadable(_) | Self::EncryptedSource => ErrorKind::SourceUnreadable,
            Self::Codec { .. } => ErrorKind::Codec,
            Self::Io(_) | Self::Serialization(_) => ErrorKind::Io,
        }
    }

    /// Whether the caller can correct its input and retry against unchanged
    /// session state.
    ///
    /// Codec failures are deterministic for a given input, so retrying them
    /// unchanged reproduces the same failure; they are not recoverable here.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation
                | ErrorKind::CannotDeleteAll
                | ErrorKind::InsufficientInputs
                | ErrorKind::Superseded
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PagewerkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_errors_are_validation() {
        let err = PagewerkError::InvalidRange {
            start: 3,
            end: 2,
            page_count: 5,
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "page range 3..=2 is invalid for a 5 page document"
        );
    }

    #[test]
    fn corruption_is_fatal() {
        let err = PagewerkError::StateCorruption("duplicate page 2".into());
        assert_eq!(err.kind(), ErrorKind::StateCorruption);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn codec_error_names_operation() {
        let err = PagewerkError::codec("save rebuilt document", "disk full");
        assert_eq!(err.to_string(), "save rebuilt document failed: disk full");
        assert!(!err.is_recoverable());
    }
}
