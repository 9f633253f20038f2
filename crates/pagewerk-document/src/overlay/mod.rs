// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content mutations — text, image, and signature overlays drawn onto a
// reopened document.

pub mod image;
pub mod signature;
pub mod text;

use pagewerk_core::EditorConfig;
use pagewerk_core::error::{PagewerkError, Result};
use serde::{Deserialize, Serialize};

use crate::pdf::editable::EditableDocument;

pub use self::image::ImageOverlay;
pub use self::signature::{SignatureInk, SignatureOverlay};
pub use self::text::{StandardFont, TextOverlay};

/// A change to page content, applied to a document reopened in mutable mode.
///
/// Implementations own the conversion from their top-left-origin placement
/// to the codec's bottom-left user space (see
/// [`PageGeometry`](crate::pdf::editable::PageGeometry)).
pub trait ContentMutation {
    /// Short label used in logs and error messages.
    fn describe(&self) -> String;

    /// Draw onto `document`. `config` supplies defaults for anything the
    /// mutation leaves unspecified.
    fn apply(&self, document: &mut EditableDocument, config: &EditorConfig) -> Result<()>;
}

/// Top-left corner of an overlay in displayed page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// 1-indexed page of the document being edited.
    pub page: u32,
    /// Points from the left edge of the displayed page.
    pub x: f32,
    /// Points from the top edge of the displayed page.
    pub y: f32,
}

/// Any of the built-in overlays.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Text(TextOverlay),
    Image(ImageOverlay),
    Signature(SignatureOverlay),
}

impl ContentMutation for Overlay {
    fn describe(&self) -> String {
        match self {
            Self::Text(overlay) => overlay.describe(),
            Self::Image(overlay) => overlay.describe(),
            Self::Signature(overlay) => overlay.describe(),
        }
    }

    fn apply(&self, document: &mut EditableDocument, config: &EditorConfig) -> Result<()> {
        match self {
            Self::Text(overlay) => overlay.apply(document, config),
            Self::Image(overlay) => overlay.apply(document, config),
            Self::Signature(overlay) => overlay.apply(document, config),
        }
    }
}

/// Reject sizes that would produce an invisible or degenerate drawing.
pub(crate) fn require_positive(what: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PagewerkError::Validation(format!(
            "{what} must be a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_overlays_deserialise() {
        let text: TextOverlay = serde_json::from_str(
            r#"{ "placement": { "page": 1, "x": 10, "y": 20 }, "text": "Approved" }"#,
        )
        .unwrap();
        assert_eq!(text.font, StandardFont::Helvetica);
        assert!(Overlay::Text(text).describe().contains("page 1"));
    }

    #[test]
    fn positive_sizes_only() {
        assert!(require_positive("width", 1.0).is_ok());
        assert!(require_positive("width", 0.0).is_err());
        assert!(require_positive("width", f32::NAN).is_err());
    }
}
