// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit session — the source registry plus the pending tables layered on it.

use std::collections::BTreeSet;

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{PageRange, RotateStep, Rotation, SessionId};
use pagewerk_core::{EditorConfig, PageOrder, RotationLedger, Selection, Snapshot};
use pagewerk_document::{CodecOptions, SourceDocument, check_input_size, extract, rebuild};
use tracing::{debug, error, info, instrument};

/// One open document and every edit pending against it.
///
/// Structural edits (reorder, rotate, delete) only touch the in-memory
/// tables; [`EditSession::rebuild`] turns them into a document on demand.
/// Content edits go through [`EditSession::apply_content_edit`], which
/// commits a new snapshot and resets the tables.
#[derive(Debug)]
pub struct EditSession {
    pub(crate) id: SessionId,
    pub(crate) config: EditorConfig,
    pub(crate) options: CodecOptions,
    pub(crate) snapshot: Snapshot,
    pub(crate) order: PageOrder,
    pub(crate) ledger: RotationLedger,
    pub(crate) selection: Selection,
    /// Order position of the page the user is looking at.
    pub(crate) current_page: usize,
    /// Bumped on every commit.
    pub(crate) revision: u64,
    /// Bumped on every change that affects rebuild output.
    pub(crate) generation: u64,
    /// Set once a state corruption has been detected.
    pub(crate) poisoned: Option<String>,
}

impl EditSession {
    /// Open a session on `bytes`: identity order, no pending rotations,
    /// nothing selected.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn ingest(bytes: Vec<u8>, config: EditorConfig) -> Result<Self> {
        let options = CodecOptions::from(&config);
        let snapshot = load_snapshot(bytes, &options)?;
        let session = Self {
            id: SessionId::new(),
            config,
            options,
            order: PageOrder::identity(snapshot.page_count()),
            snapshot,
            ledger: RotationLedger::new(),
            selection: Selection::new(),
            current_page: 0,
            revision: 0,
            generation: 0,
            poisoned: None,
        };
        info!(
            session = %session.id,
            pages = session.snapshot.page_count(),
            fingerprint = session.snapshot.fingerprint(),
            "session opened"
        );
        Ok(session)
    }

    /// Replace the document of this session with `bytes`, discarding every
    /// pending edit. This is also the only way out of a poisoned state.
    #[instrument(skip_all, fields(session = %self.id, bytes_len = bytes.len()))]
    pub fn reload(&mut self, bytes: Vec<u8>) -> Result<()> {
        let snapshot = load_snapshot(bytes, &self.options)?;
        self.order = PageOrder::identity(snapshot.page_count());
        self.snapshot = snapshot;
        self.ledger.clear();
        self.selection.clear();
        self.current_page = 0;
        self.revision += 1;
        self.generation += 1;
        self.poisoned = None;
        info!(pages = self.snapshot.page_count(), "document reloaded");
        Ok(())
    }

    // -- Accessors -----------------------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn order(&self) -> &PageOrder {
        &self.order
    }

    pub fn ledger(&self) -> &RotationLedger {
        &self.ledger
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Pages the next rebuild will produce.
    pub fn page_count(&self) -> usize {
        self.order.len()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned.is_some()
    }

    /// Whether anything is pending on top of the snapshot.
    pub fn has_pending_edits(&self) -> bool {
        !self.order.is_identity() || self.order.len() != self.snapshot.page_count() || !self.ledger.is_empty()
    }

    /// Pending rotation delta of the page at an order position.
    pub fn pending_rotation(&self, position: usize) -> Result<Rotation> {
        let original = self.original_at(position)?;
        Ok(self.ledger.get(original))
    }

    // -- Structural edits ----------------------------------------------------

    /// Move the page at `from` to `to`. The selection is cleared and the
    /// current page follows the moved page.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_usable()?;
        self.order.move_page(from, to)?;
        self.selection.clear();
        self.current_page = to;
        self.generation += 1;
        debug!(from, to, "page moved");
        Ok(())
    }

    /// Turn the pages at `positions` by one quarter step.
    pub fn rotate(&mut self, positions: &BTreeSet<usize>, step: RotateStep) -> Result<()> {
        self.ensure_usable()?;
        if positions.is_empty() {
            return Err(PagewerkError::Validation("no pages selected".into()));
        }
        let originals = positions
            .iter()
            .map(|&position| self.original_at(position))
            .collect::<Result<Vec<_>>>()?;

        for original in originals {
            let delta = self.ledger.rotate(original, step.as_rotation());
            debug!(original, %delta, "rotation pending");
        }
        self.selection.clear();
        self.generation += 1;
        Ok(())
    }

    pub fn rotate_selection(&mut self, step: RotateStep) -> Result<()> {
        let positions = self.selection.positions().clone();
        self.rotate(&positions, step)
    }

    /// Remove the pages at `positions`, returning their original indices.
    ///
    /// Removing every page is refused with
    /// [`PagewerkError::CannotDeleteAll`] and leaves the session unchanged.
    pub fn delete(&mut self, positions: &BTreeSet<usize>) -> Result<Vec<usize>> {
        self.ensure_usable()?;
        let removed = self.order.remove_positions(positions)?;

        let shift = positions.range(..self.current_page).count();
        self.current_page = (self.current_page - shift).min(self.order.len() - 1);
        self.selection.clear();
        self.generation += 1;
        debug!(removed = ?removed, remaining = self.order.len(), "pages deleted");
        Ok(removed)
    }

    pub fn delete_selection(&mut self) -> Result<Vec<usize>> {
        let positions = self.selection.positions().clone();
        self.delete(&positions)
    }

    // -- Selection -----------------------------------------------------------

    pub fn select(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        self.selection.select(position);
        Ok(())
    }

    pub fn deselect(&mut self, position: usize) {
        self.selection.deselect(position);
    }

    /// Flip a position's membership; returns whether it is now selected.
    pub fn toggle_selection(&mut self, position: usize) -> Result<bool> {
        self.check_position(position)?;
        Ok(self.selection.toggle(position))
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(self.order.len());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn set_current_page(&mut self, position: usize) -> Result<()> {
        self.check_position(position)?;
        self.current_page = position;
        Ok(())
    }

    // -- Output --------------------------------------------------------------

    /// Materialise the pending edits without committing them.
    pub fn rebuild(&mut self) -> Result<Vec<u8>> {
        self.ensure_usable()?;
        let result = rebuild(&self.snapshot, &self.order, &self.ledger, &self.options);
        self.observe(result)
    }

    /// Rebuild, then copy out the pages of `range` (1-indexed against the
    /// rebuilt document). Nothing is committed.
    pub fn extract(&mut self, range: PageRange) -> Result<Vec<u8>> {
        range.validate(self.page_count())?;
        let rebuilt = self.rebuild()?;
        let source = SourceDocument::load(&rebuilt, &self.options)?;
        extract(&source, range, &self.options)
    }

    // -- Internals -----------------------------------------------------------

    fn original_at(&self, position: usize) -> Result<usize> {
        self.order.original_at(position).ok_or_else(|| {
            PagewerkError::Validation(format!(
                "position {position} is out of range for a {} page document",
                self.order.len()
            ))
        })
    }

    fn check_position(&self, position: usize) -> Result<()> {
        self.original_at(position).map(|_| ())
    }

    /// Refuse to work on state that has been found corrupt.
    pub(crate) fn ensure_usable(&self) -> Result<()> {
        match &self.poisoned {
            Some(reason) => Err(PagewerkError::StateCorruption(format!(
                "session was poisoned earlier: {reason}"
            ))),
            None => Ok(()),
        }
    }

    /// Poison the session when `result` reports a corruption.
    pub(crate) fn observe<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(PagewerkError::StateCorruption(reason)) = &result {
            error!(session = %self.id, %reason, "edit state corrupt, refusing further edits");
            self.poisoned = Some(reason.clone());
        }
        result
    }
}

/// Check and load external bytes into a snapshot.
fn load_snapshot(bytes: Vec<u8>, options: &CodecOptions) -> Result<Snapshot> {
    check_input_size(&bytes, options)?;
    let page_count = SourceDocument::load(&bytes, options)?.page_count();
    if page_count == 0 {
        return Err(PagewerkError::Validation("document has no pages".into()));
    }
    Ok(Snapshot::new(bytes, page_count))
}
