// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rebuild engine — materialise pending structural edits into a fresh
// document.

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{PageOrder, RotationLedger, Snapshot};
use tracing::{debug, info, instrument};

use crate::pdf::codec::{CodecOptions, DestinationDocument, SourceDocument};

/// Produce a new document whose page `k` is snapshot page `order[k]`, turned
/// by the ledger's delta for that original index on top of its intrinsic
/// rotation.
///
/// The order table and ledger are checked against the snapshot before the
/// codec is touched; an inconsistency is [`PagewerkError::StateCorruption`].
/// Nothing is returned unless the whole document was written.
#[instrument(skip_all, fields(pages = order.len(), rotations = ledger.len()))]
pub fn rebuild(
    snapshot: &Snapshot,
    order: &PageOrder,
    ledger: &RotationLedger,
    options: &CodecOptions,
) -> Result<Vec<u8>> {
    order.validate(snapshot.page_count())?;
    if let Some((original, _)) = ledger.iter().find(|&(original, _)| original >= snapshot.page_count()) {
        return Err(PagewerkError::StateCorruption(format!(
            "rotation recorded for page {original} of a {} page snapshot",
            snapshot.page_count()
        )));
    }

    let source = SourceDocument::load(snapshot.bytes(), options)?;
    if source.page_count() != snapshot.page_count() {
        return Err(PagewerkError::StateCorruption(format!(
            "snapshot claims {} pages but the document has {}",
            snapshot.page_count(),
            source.page_count()
        )));
    }

    let mut destination = DestinationDocument::new(options);
    let copied = destination.copy_pages(&source, order.as_slice())?;
    for (&original, page) in order.as_slice().iter().zip(copied) {
        let delta = ledger.get(original);
        if !delta.is_zero() {
            let rotation = destination.rotation_angle(page).compose(delta);
            debug!(original, %rotation, "applying pending rotation");
            destination.set_rotation(page, rotation)?;
        }
        destination.add_page(page);
    }

    let page_count = destination.page_count();
    let bytes = destination.save(options)?;
    info!(page_count, output_bytes = bytes.len(), "document rebuilt");
    Ok(bytes)
}
