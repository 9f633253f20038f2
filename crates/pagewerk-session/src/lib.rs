// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-session — Edit sessions for the Pagewerk page editor.
//
// An `EditSession` owns one committed document snapshot plus the pending page
// order, rotation ledger, and selection. Structural edits stay pending until
// a rebuild; content edits are committed through the chaining protocol in
// `chain`. `SharedSession` wraps a session for async callers.

pub mod chain;
pub mod session;
pub mod shared;

pub use chain::{CommitInput, PreparedCommit};
pub use session::EditSession;
pub use shared::SharedSession;
