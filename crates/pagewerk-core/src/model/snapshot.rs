// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document snapshot — the committed, immutable source bytes.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::integrity::hash_bytes;

/// The document as currently committed.
///
/// Never mutated in place: every commit installs a new snapshot. The bytes
/// are reference counted so that a rebuild running on another thread can
/// hold them without copying.
#[derive(Debug, Clone)]
pub struct Snapshot {
    bytes: Arc<[u8]>,
    page_count: usize,
    fingerprint: String,
    created_at: DateTime<Utc>,
}

impl Snapshot {
    /// Wrap bytes whose page count has already been established by the codec.
    pub fn new(bytes: impl Into<Arc<[u8]>>, page_count: usize) -> Self {
        let bytes = bytes.into();
        let fingerprint = hash_bytes(&bytes);
        Self {
            bytes,
            page_count,
            fingerprint,
            created_at: Utc::now(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A cheap handle on the underlying buffer.
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// SHA-256 of the bytes, lowercase hex.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
