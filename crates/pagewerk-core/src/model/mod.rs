// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit-state model — the committed snapshot and the pending tables layered on
// top of it.
//
// Three coordinate spaces are in play:
//   - original index: a page's position inside the installed snapshot,
//     stable until the snapshot is replaced (order entries, ledger keys);
//   - order position: a page's position inside the page order table,
//     which moves on every reorder or delete (selection entries);
//   - output page: after a rebuild, output page k is order position k.

pub mod ledger;
pub mod order;
pub mod selection;
pub mod snapshot;

pub use ledger::RotationLedger;
pub use order::PageOrder;
pub use selection::Selection;
pub use snapshot::Snapshot;
