// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — Core types, edit-state model, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod integrity;
pub mod model;
pub mod types;

pub use config::EditorConfig;
pub use error::{ErrorKind, PagewerkError};
pub use model::{PageOrder, RotationLedger, Selection, Snapshot};
pub use types::*;
