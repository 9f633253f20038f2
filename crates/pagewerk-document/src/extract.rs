// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Range extractor — derive new documents from page ranges of an existing one.

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::PageRange;
use tracing::{debug, info, instrument};

use crate::pdf::codec::{CodecOptions, DestinationDocument, SourceDocument, check_input_size};

/// Copy the pages of `range` (1-indexed, inclusive) out of an already loaded
/// document, keeping their relative order.
pub fn extract(source: &SourceDocument, range: PageRange, options: &CodecOptions) -> Result<Vec<u8>> {
    range.validate(source.page_count())?;

    let indices: Vec<usize> = range.indices().collect();
    let mut destination = DestinationDocument::new(options);
    for page in destination.copy_pages(source, &indices)? {
        destination.add_page(page);
    }
    let output = destination.save(options)?;
    debug!(start = range.start, end = range.end, output_bytes = output.len(), "range extracted");
    Ok(output)
}

/// Extract `range` from a serialised document.
#[instrument(skip(bytes, options), fields(bytes_len = bytes.len()))]
pub fn split(bytes: &[u8], range: PageRange, options: &CodecOptions) -> Result<Vec<u8>> {
    check_input_size(bytes, options)?;
    let source = SourceDocument::load(bytes, options)?;
    info!(start = range.start, end = range.end, total = source.page_count(), "splitting PDF");
    extract(&source, range, options)
}

/// Split a document after `after_page` (1-indexed) into pages
/// `[1..=after_page]` and `[after_page+1..=end]`. Both halves must be
/// non-empty.
#[instrument(skip(bytes, options), fields(bytes_len = bytes.len()))]
pub fn split_at(bytes: &[u8], after_page: u32, options: &CodecOptions) -> Result<(Vec<u8>, Vec<u8>)> {
    check_input_size(bytes, options)?;
    let source = SourceDocument::load(bytes, options)?;
    let total = source.page_count();
    if after_page == 0 || after_page as usize >= total {
        return Err(PagewerkError::Validation(format!(
            "split point {after_page} invalid for a {total} page document"
        )));
    }

    info!(after_page, total, "splitting PDF in two");
    let first = extract(&source, PageRange::new(1, after_page), options)?;
    let second = extract(&source, PageRange::new(after_page + 1, total as u32), options)?;
    Ok((first, second))
}
