// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the codec boundary over lopdf: reading, page copying,
// rotation, mutable reopening, and serialisation.

mod clone;
pub mod codec;
pub mod editable;

pub use codec::{CodecOptions, DestinationDocument, PageRef, SourceDocument};
pub use editable::{EditableDocument, PageGeometry};
