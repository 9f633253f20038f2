// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared session handle for async front ends.
//
// The session sits behind one `tokio::sync::Mutex`. Codec work (load,
// rebuild, mutate, save) is CPU bound and runs on the blocking pool with an
// owned copy of the state it needs; the lock is held only to take that copy
// and, for content edits, across the install step. A content edit whose
// baseline changed while it was running fails with `Superseded`.

use std::sync::Arc;

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{PageRange, SessionId};
use pagewerk_core::{EditorConfig, Snapshot};
use pagewerk_document::{CodecOptions, ContentMutation, SourceDocument, extract, rebuild};
use tokio::sync::Mutex;
use tracing::debug;

use crate::session::EditSession;

/// Cheaply cloneable handle on one [`EditSession`].
#[derive(Clone)]
pub struct SharedSession {
    id: SessionId,
    inner: Arc<Mutex<EditSession>>,
}

impl SharedSession {
    pub fn new(session: EditSession) -> Self {
        Self {
            id: session.id(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Ingest `bytes` on the blocking pool.
    pub async fn ingest(bytes: Vec<u8>, config: EditorConfig) -> Result<Self> {
        let session = run_blocking("ingest", move || EditSession::ingest(bytes, config)).await?;
        Ok(Self::new(session))
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Run a quick, codec-free operation (reorder, rotate, delete, select,
    /// queries) with the session locked.
    pub async fn with<R>(&self, operation: impl FnOnce(&mut EditSession) -> R) -> R {
        let mut session = self.inner.lock().await;
        operation(&mut session)
    }

    pub async fn page_count(&self) -> usize {
        self.inner.lock().await.page_count()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.snapshot().clone()
    }

    /// Materialise the pending edits without committing them.
    pub async fn rebuild(&self) -> Result<Vec<u8>> {
        let (snapshot, order, ledger, options) = {
            let session = self.inner.lock().await;
            session.ensure_usable()?;
            (
                session.snapshot.clone(),
                session.order.clone(),
                session.ledger.clone(),
                session.options.clone(),
            )
        };
        let result = run_blocking("rebuild", move || rebuild(&snapshot, &order, &ledger, &options)).await;
        self.inner.lock().await.observe(result)
    }

    /// Rebuild and extract `range` from the result. Nothing is committed.
    pub async fn extract(&self, range: PageRange) -> Result<Vec<u8>> {
        let options: CodecOptions = {
            let session = self.inner.lock().await;
            range.validate(session.page_count())?;
            session.options.clone()
        };
        let rebuilt = self.rebuild().await?;
        run_blocking("extract", move || {
            let source = SourceDocument::load(&rebuilt, &options)?;
            extract(&source, range, &options)
        })
        .await
    }

    /// Apply and commit a content mutation; see
    /// [`EditSession::apply_content_edit`].
    pub async fn apply_content_edit<M>(&self, mutation: M) -> Result<Vec<u8>>
    where
        M: ContentMutation + Send + 'static,
    {
        let input = {
            let session = self.inner.lock().await;
            session.ensure_usable()?;
            session.commit_input()
        };
        let prepared = run_blocking("content edit", move || input.prepare(&mutation)).await;

        let mut session = self.inner.lock().await;
        let prepared = session.observe(prepared)?;
        session.install(prepared)
    }
}

/// Run codec work on the blocking pool, flattening join failures into the
/// codec error taxonomy.
async fn run_blocking<T, F>(operation: &'static str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    debug!(operation, "dispatching to blocking pool");
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| PagewerkError::codec(operation, format!("worker task failed: {err}")))?
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pagewerk_core::types::RotateStep;
    use pagewerk_document::{Placement, TextOverlay, fixtures};

    use super::*;

    async fn shared(pages: usize) -> SharedSession {
        SharedSession::ingest(fixtures::sample_pdf(pages), EditorConfig::default())
            .await
            .unwrap()
    }

    fn text(page: u32) -> TextOverlay {
        TextOverlay {
            placement: Placement {
                page,
                x: 20.0,
                y: 20.0,
            },
            text: "Shared".into(),
            font: Default::default(),
            font_size: Some(10.0),
            color: None,
        }
    }

    #[tokio::test]
    async fn structural_edits_then_rebuild() {
        let session = shared(3).await;
        session
            .with(|s| {
                s.reorder(2, 0)?;
                s.rotate(&BTreeSet::from([0]), RotateStep::Clockwise)
            })
            .await
            .unwrap();

        let output = session.rebuild().await.unwrap();
        assert_eq!(fixtures::page_markers(&output), vec![2, 0, 1]);
        assert_eq!(fixtures::page_rotations(&output), vec![90, 0, 0]);
        assert_eq!(session.page_count().await, 3);
    }

    #[tokio::test]
    async fn content_edit_commits() {
        let session = shared(2).await;
        session.with(|s| s.delete(&BTreeSet::from([0]))).await.unwrap();

        let committed = session.apply_content_edit(text(1)).await.unwrap();
        assert_eq!(fixtures::page_markers(&committed), vec![1]);
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.page_count(), 1);
        assert!(session.with(|s| s.order().is_identity()).await);
    }

    #[tokio::test]
    async fn failed_content_edit_leaves_state() {
        let session = shared(2).await;
        session.with(|s| s.reorder(0, 1)).await.unwrap();
        let err = session.apply_content_edit(text(9)).await.unwrap_err();
        assert!(matches!(err, PagewerkError::Validation(_)));
        assert_eq!(session.with(|s| s.order().as_slice().to_vec()).await, vec![1, 0]);
    }

    #[tokio::test]
    async fn extract_does_not_commit() {
        let session = shared(4).await;
        session.with(|s| s.reorder(3, 0)).await.unwrap();
        let part = session.extract(PageRange::new(1, 2)).await.unwrap();
        assert_eq!(fixtures::page_markers(&part), vec![3, 0]);
        assert_eq!(session.with(|s| s.revision()).await, 0);
    }

    #[tokio::test]
    async fn ingest_failure_is_reported() {
        let result = SharedSession::ingest(b"junk".to_vec(), EditorConfig::default()).await;
        assert!(matches!(result, Err(PagewerkError::SourceUnreadable(_))));
    }
}
