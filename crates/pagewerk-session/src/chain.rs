// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit chaining — layer a content mutation on top of the pending structural
// edits and commit the result as the new baseline.
//
// The work is split in two so that the expensive part can run away from the
// session: `CommitInput::prepare` (rebuild, reopen, mutate, serialise) is a
// pure function of an owned copy of the session state, and
// `EditSession::install` is the only step that writes to the session.

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{EditorConfig, PageOrder, RotationLedger, Snapshot};
use pagewerk_document::{CodecOptions, ContentMutation, EditableDocument, rebuild};
use tracing::{info, instrument, warn};

use crate::session::EditSession;

/// Everything a content edit reads from the session, detached from it.
#[derive(Debug, Clone)]
pub struct CommitInput {
    snapshot: Snapshot,
    order: PageOrder,
    ledger: RotationLedger,
    config: EditorConfig,
    options: CodecOptions,
    generation: u64,
}

/// Serialised result of a content edit, not yet installed.
#[derive(Debug)]
pub struct PreparedCommit {
    bytes: Vec<u8>,
    page_count: usize,
    /// Session generation the edit was based on.
    generation: u64,
}

impl PreparedCommit {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl CommitInput {
    /// Rebuild the pending edits, reopen the result for editing, apply
    /// `mutation`, and serialise.
    #[instrument(skip_all, fields(mutation = %mutation.describe(), generation = self.generation))]
    pub fn prepare<M: ContentMutation + ?Sized>(&self, mutation: &M) -> Result<PreparedCommit> {
        let baseline = rebuild(&self.snapshot, &self.order, &self.ledger, &self.options)?;
        let mut document = EditableDocument::load(&baseline, &self.options)?;
        mutation
            .apply(&mut document, &self.config)
            .map_err(|err| name_failure(&mutation.describe(), err))
            .inspect_err(|err| warn!(%err, "content edit rejected"))?;
        let (bytes, page_count) = document.save(&self.options)?;
        Ok(PreparedCommit {
            bytes,
            page_count,
            generation: self.generation,
        })
    }
}

/// Prefix a mutation's own error with what the mutation was doing. Codec
/// errors already carry their operation name.
fn name_failure(description: &str, err: PagewerkError) -> PagewerkError {
    match err {
        PagewerkError::Validation(message) => {
            PagewerkError::Validation(format!("{description}: {message}"))
        }
        PagewerkError::ImageError(message) => {
            PagewerkError::ImageError(format!("{description}: {message}"))
        }
        other => other,
    }
}

impl EditSession {
    /// Apply a content mutation on top of every pending structural edit and
    /// commit the result as the new snapshot, returning its bytes.
    ///
    /// On success the page order is reset to the identity, the rotation
    /// ledger and selection are cleared, and the current page is clamped. On
    /// failure the session is left exactly as it was.
    pub fn apply_content_edit<M: ContentMutation + ?Sized>(&mut self, mutation: &M) -> Result<Vec<u8>> {
        self.ensure_usable()?;
        let prepared = self.commit_input().prepare(mutation);
        let prepared = self.observe(prepared)?;
        self.install(prepared)
    }

    /// Copy out what [`CommitInput::prepare`] needs.
    pub fn commit_input(&self) -> CommitInput {
        CommitInput {
            snapshot: self.snapshot.clone(),
            order: self.order.clone(),
            ledger: self.ledger.clone(),
            config: self.config.clone(),
            options: self.options.clone(),
            generation: self.generation,
        }
    }

    /// Install a prepared commit.
    ///
    /// Fails with [`PagewerkError::Superseded`] when the session changed
    /// since the input was taken; the session is then left untouched.
    pub fn install(&mut self, prepared: PreparedCommit) -> Result<Vec<u8>> {
        self.ensure_usable()?;
        if prepared.generation != self.generation {
            return Err(PagewerkError::Superseded);
        }
        if prepared.page_count == 0 {
            return Err(PagewerkError::StateCorruption(
                "content edit produced a document without pages".into(),
            ));
        }

        let PreparedCommit { bytes, page_count, .. } = prepared;
        self.snapshot = Snapshot::new(bytes.clone(), page_count);
        self.order = PageOrder::identity(page_count);
        self.ledger.clear();
        self.selection.clear();
        self.current_page = self.current_page.min(page_count - 1);
        self.revision += 1;
        self.generation += 1;

        info!(
            session = %self.id,
            revision = self.revision,
            pages = page_count,
            fingerprint = self.snapshot.fingerprint(),
            "content edit committed"
        );
        Ok(bytes)
    }
}
