// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Selection set — order positions marked for the next batch rotate/delete.

use std::collections::BTreeSet;

/// Order positions chosen by the user.
///
/// Positions are only meaningful until the next structural mutation, after
/// which the owning session clears the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<usize>);

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, position: usize) {
        self.0.insert(position);
    }

    pub fn deselect(&mut self, position: usize) {
        self.0.remove(&position);
    }

    /// Flip membership and return whether the position is now selected.
    pub fn toggle(&mut self, position: usize) -> bool {
        if self.0.remove(&position) {
            false
        } else {
            self.0.insert(position);
            true
        }
    }

    /// Select every position of a table of `len` pages.
    pub fn select_all(&mut self, len: usize) {
        self.0 = (0..len).collect();
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn contains(&self, position: usize) -> bool {
        self.0.contains(&position)
    }

    pub fn positions(&self) -> &BTreeSet<usize> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
