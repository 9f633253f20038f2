// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page order table — the desired output order, as original page indices.

use std::collections::{BTreeSet, HashSet};

use crate::error::{PagewerkError, Result};

/// Ordered sequence of original page indices.
///
/// Entries are distinct and lie in `[0, page_count)` of the installed
/// snapshot. Starts as the identity permutation; reorder permutes it and
/// delete shortens it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrder(Vec<usize>);

impl PageOrder {
    /// `[0, 1, .., page_count - 1]`.
    pub fn identity(page_count: usize) -> Self {
        Self((0..page_count).collect())
    }

    /// Build a table from raw indices without checking them.
    ///
    /// [`PageOrder::validate`] is what the rebuild engine runs before trusting
    /// a table, so an inconsistent table built here is caught there.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Original index shown at `position`.
    pub fn original_at(&self, position: usize) -> Option<usize> {
        self.0.get(position).copied()
    }

    /// Current position of an original page, if it has not been deleted.
    pub fn position_of(&self, original: usize) -> Option<usize> {
        self.0.iter().position(|&index| index == original)
    }

    pub fn is_identity(&self) -> bool {
        self.0.iter().enumerate().all(|(position, &index)| position == index)
    }

    /// Move the page at `from` so that it ends up at `to`.
    ///
    /// `[0, 1, 2, 3]` with `move_page(0, 2)` becomes `[1, 2, 0, 3]`.
    pub fn move_page(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.0.len();
        if from >= len || to >= len {
            return Err(PagewerkError::Validation(format!(
                "cannot move position {from} to {to} in a {len} page order"
            )));
        }
        let index = self.0.remove(from);
        self.0.insert(to, index);
        Ok(())
    }

    /// Remove the pages at the given positions, returning their original
    /// indices in position order.
    ///
    /// The table is left untouched on every error path.
    pub fn remove_positions(&mut self, positions: &BTreeSet<usize>) -> Result<Vec<usize>> {
        let len = self.0.len();
        if positions.is_empty() {
            return Err(PagewerkError::Validation("no pages selected".into()));
        }
        if let Some(&bad) = positions.iter().find(|&&position| position >= len) {
            return Err(PagewerkError::Validation(format!(
                "position {bad} is out of range for a {len} page order"
            )));
        }
        if positions.len() == len {
            return Err(PagewerkError::CannotDeleteAll);
        }

        let removed = positions.iter().map(|&position| self.0[position]).collect();
        let mut position = 0;
        self.0.retain(|_| {
            let keep = !positions.contains(&position);
            position += 1;
            keep
        });
        Ok(removed)
    }

    /// Check the table against a snapshot of `page_count` pages.
    ///
    /// Any failure is [`PagewerkError::StateCorruption`]: the table is only
    /// ever mutated through the checked operations above, so a bad table is a
    /// defect, not bad input.
    pub fn validate(&self, page_count: usize) -> Result<()> {
        if self.0.is_empty() {
            return Err(PagewerkError::StateCorruption(
                "page order is empty".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.0.len());
        for (position, &index) in self.0.iter().enumerate() {
            if index >= page_count {
                return Err(PagewerkError::StateCorruption(format!(
                    "position {position} refers to page {index} of a {page_count} page snapshot"
                )));
            }
            if !seen.insert(index) {
                return Err(PagewerkError::StateCorruption(format!(
                    "page {index} appears more than once in the page order"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn reorder_then_delete() {
        let mut order = PageOrder::identity(4);
        order.move_page(0, 2).unwrap();
        assert_eq!(order.as_slice(), &[1, 2, 0, 3]);

        let removed = order.remove_positions(&positions(&[1])).unwrap();
        assert_eq!(removed, vec![2]);
        assert_eq!(order.as_slice(), &[1, 0, 3]);
    }

    #[test]
    fn move_towards_front() {
        let mut order = PageOrder::identity(4);
        order.move_page(3, 0).unwrap();
        assert_eq!(order.as_slice(), &[3, 0, 1, 2]);
        assert_eq!(order.position_of(0), Some(1));
        assert!(!order.is_identity());
    }

    #[test]
    fn move_out_of_range_is_rejected() {
        let mut order = PageOrder::identity(3);
        assert!(order.move_page(0, 3).is_err());
        assert_eq!(order, PageOrder::identity(3));
    }

    #[test]
    fn deleting_everything_is_rejected() {
        let mut order = PageOrder::identity(3);
        let err = order.remove_positions(&positions(&[0, 1, 2])).unwrap_err();
        assert!(matches!(err, PagewerkError::CannotDeleteAll));
        assert_eq!(order, PageOrder::identity(3));
    }

    #[test]
    fn empty_or_stale_selection_is_rejected() {
        let mut order = PageOrder::identity(3);
        assert!(matches!(
            order.remove_positions(&BTreeSet::new()),
            Err(PagewerkError::Validation(_))
        ));
        assert!(matches!(
            order.remove_positions(&positions(&[1, 7])),
            Err(PagewerkError::Validation(_))
        ));
        assert_eq!(order, PageOrder::identity(3));
    }

    #[test]
    fn validate_catches_corruption() {
        assert!(PageOrder::identity(3).validate(3).is_ok());
        assert!(PageOrder::from_indices(vec![2, 0]).validate(3).is_ok());
        assert!(matches!(
            PageOrder::from_indices(vec![0, 3]).validate(3),
            Err(PagewerkError::StateCorruption(_))
        ));
        assert!(matches!(
            PageOrder::from_indices(vec![1, 1]).validate(3),
            Err(PagewerkError::StateCorruption(_))
        ));
        assert!(matches!(
            PageOrder::from_indices(Vec::new()).validate(3),
            Err(PagewerkError::StateCorruption(_))
        ));
    }
}
