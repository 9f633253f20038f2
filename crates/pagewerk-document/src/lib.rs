// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-document — Document processing for the Pagewerk page editor.
//
// Provides the PDF codec boundary (load, copy pages, rotation, save), the
// rebuild engine that materialises pending structural edits, merge and split,
// and the content overlays (text, image, signature) applied on commit.

pub mod compose;
pub mod extract;
pub mod overlay;
pub mod pdf;
pub mod rebuild;

#[cfg(any(test, feature = "test-support"))]
pub mod fixtures;

// Re-export the primary entry points so callers can use `pagewerk_document::rebuild` etc.
pub use compose::merge;
pub use extract::{extract, split, split_at};
pub use overlay::{
    ContentMutation, ImageOverlay, Overlay, Placement, SignatureInk, SignatureOverlay,
    StandardFont, TextOverlay,
};
pub use pdf::codec::{CodecOptions, SourceDocument, check_input_size};
pub use pdf::editable::{EditableDocument, PageGeometry};
pub use rebuild::rebuild;
