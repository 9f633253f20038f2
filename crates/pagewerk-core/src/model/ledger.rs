// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rotation ledger — pending rotation deltas keyed by original page index.

use std::collections::BTreeMap;

use crate::types::Rotation;

/// Additional rotation per original page index.
///
/// Keys are original indices of the installed snapshot, so they survive
/// reorders and deletes unchanged. They are meaningless against any other
/// snapshot, which is why the ledger is cleared on every commit. A page
/// whose accumulated delta returns to zero is dropped from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationLedger(BTreeMap<usize, Rotation>);

impl RotationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending delta for an original page, zero when none is recorded.
    pub fn get(&self, original: usize) -> Rotation {
        self.0.get(&original).copied().unwrap_or_default()
    }

    /// Compose `delta` onto the page's pending delta and return the result.
    pub fn rotate(&mut self, original: usize, delta: Rotation) -> Rotation {
        let updated = self.get(original).compose(delta);
        if updated.is_zero() {
            self.0.remove(&original);
        } else {
            self.0.insert(original, updated);
        }
        updated
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Non-zero entries in original-index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Rotation)> + '_ {
        self.0.iter().map(|(&index, &rotation)| (index, rotation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RotateStep;

    #[test]
    fn quarter_turns_wrap_and_vanish() {
        let mut ledger = RotationLedger::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(ledger.rotate(2, RotateStep::Clockwise.as_rotation()).degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
        assert!(ledger.is_empty());
        assert_eq!(ledger.get(2), Rotation::ZERO);
    }

    #[test]
    fn counter_clockwise_from_zero() {
        let mut ledger = RotationLedger::new();
        ledger.rotate(0, RotateStep::CounterClockwise.as_rotation());
        assert_eq!(ledger.get(0), Rotation::THREE_QUARTERS);
        assert_eq!(ledger.get(1), Rotation::ZERO);
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec![(0, Rotation::THREE_QUARTERS)]);
    }
}
