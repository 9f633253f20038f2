// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Multi-source composer — concatenate independently loaded documents.

use pagewerk_core::error::{PagewerkError, Result};
use tracing::{info, instrument};

use crate::pdf::codec::{CodecOptions, DestinationDocument, SourceDocument, check_input_size};

/// Concatenate every page of every source, in list order.
///
/// Needs at least two sources. A source that cannot be read is reported with
/// its 1-indexed position in the list.
#[instrument(skip_all, fields(sources = sources.len()))]
pub fn merge<B: AsRef<[u8]>>(sources: &[B], options: &CodecOptions) -> Result<Vec<u8>> {
    if sources.len() < 2 {
        return Err(PagewerkError::InsufficientInputs(sources.len()));
    }

    let mut destination = DestinationDocument::new(options);
    for (position, bytes) in sources.iter().enumerate() {
        let bytes = bytes.as_ref();
        check_input_size(bytes, options)?;
        let source = SourceDocument::load(bytes, options).map_err(|err| match err {
            PagewerkError::SourceUnreadable(cause) => {
                PagewerkError::SourceUnreadable(format!("document {}: {cause}", position + 1))
            }
            other => other,
        })?;

        let indices: Vec<usize> = (0..source.page_count()).collect();
        for page in destination.copy_pages(&source, &indices)? {
            destination.add_page(page);
        }
    }

    let page_count = destination.page_count();
    let output = destination.save(options)?;
    info!(page_count, output_bytes = output.len(), "documents merged");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn pages_follow_source_order() {
        let a = fixtures::sample_pdf(2);
        let b = fixtures::sample_pdf(3);
        let merged = merge(&[&a, &b], &CodecOptions::default()).unwrap();

        assert_eq!(fixtures::page_markers(&merged), vec![0, 1, 0, 1, 2]);
        assert_eq!(fixtures::page_content(&merged, 1), fixtures::page_content(&a, 1));
        assert_eq!(fixtures::page_content(&merged, 2), fixtures::page_content(&b, 0));
        assert_eq!(fixtures::page_content(&merged, 4), fixtures::page_content(&b, 2));
    }

    #[test]
    fn intrinsic_rotations_survive() {
        let a = fixtures::sample_pdf_with_inherited_rotation(1, 270);
        let b = fixtures::sample_pdf_with_rotations(&[90]);
        let merged = merge(&[a, b], &CodecOptions::default()).unwrap();
        assert_eq!(fixtures::page_rotations(&merged), vec![270, 90]);
    }

    #[test]
    fn one_source_is_not_enough() {
        let only = fixtures::sample_pdf(1);
        let err = merge(&[only], &CodecOptions::default()).unwrap_err();
        assert!(matches!(err, PagewerkError::InsufficientInputs(1)));
        let none: [Vec<u8>; 0] = [];
        assert!(matches!(
            merge(&none, &CodecOptions::default()),
            Err(PagewerkError::InsufficientInputs(0))
        ));
    }

    #[test]
    fn unreadable_source_is_named() {
        let good = fixtures::sample_pdf(1);
        let bad = b"garbage".to_vec();
        let err = merge(&[good, bad], &CodecOptions::default()).unwrap_err();
        match err {
            PagewerkError::SourceUnreadable(cause) => assert!(cause.starts_with("document 2")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
