// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec boundary — load, create, copy pages, read/write rotation, and
// serialise PDF documents using the `lopdf` crate.
//
// Everything above this module works in 0-indexed page indices and
// normalised `Rotation` values; lopdf's 1-indexed page map and optional,
// inheritable `/Rotate` entries never leak out of here.

use lopdf::{Dictionary, Document, Object, ObjectId};
use pagewerk_core::EditorConfig;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::Rotation;
use tracing::{debug, instrument, warn};

use super::clone::ObjectCloner;

/// Page attributes a page may inherit from its ancestors in the page tree.
pub(crate) const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `/Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 32;

/// Options applied when loading and serialising documents.
#[derive(Debug, Clone, PartialEq)]
pub struct CodecOptions {
    /// PDF header version for newly created documents.
    pub pdf_version: String,
    /// Flate-compress uncompressed streams on save.
    pub compress: bool,
    /// Fail loads of documents carrying an `/Encrypt` dictionary.
    pub reject_encrypted: bool,
    /// Upper bound for externally supplied input, checked by
    /// [`check_input_size`].
    pub max_input_bytes: Option<usize>,
}

impl From<&EditorConfig> for CodecOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            pdf_version: config.pdf_version.clone(),
            compress: config.compress_output,
            reject_encrypted: config.reject_encrypted,
            max_input_bytes: config.max_input_bytes,
        }
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

/// Reject externally supplied input larger than the configured limit.
pub fn check_input_size(bytes: &[u8], options: &CodecOptions) -> Result<()> {
    match options.max_input_bytes {
        Some(limit) if bytes.len() > limit => Err(PagewerkError::Validation(format!(
            "document is {} bytes, the limit is {limit}",
            bytes.len()
        ))),
        _ => Ok(()),
    }
}

/// Parse bytes into a lopdf document, mapping failures onto the codec
/// taxonomy.
pub(crate) fn load_document(bytes: &[u8], options: &CodecOptions) -> Result<Document> {
    let document = Document::load_mem(bytes)
        .map_err(|err| PagewerkError::SourceUnreadable(err.to_string()))?;

    if options.reject_encrypted && document.trailer.get(b"Encrypt").is_ok() {
        return Err(PagewerkError::EncryptedSource);
    }
    Ok(document)
}

/// Serialise a lopdf document.
pub(crate) fn save_document(
    document: &mut Document,
    options: &CodecOptions,
    operation: &'static str,
) -> Result<Vec<u8>> {
    if options.compress {
        document.compress();
    }
    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| PagewerkError::codec(operation, err))?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Page tree helpers
// ---------------------------------------------------------------------------

/// Look up `key` on a page, walking up `/Parent` links for inherited values.
pub(crate) fn inherited_attribute<'a>(
    document: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut dict = document.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = document.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a single indirect reference, returning the object itself otherwise.
pub(crate) fn resolve<'a>(document: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => document.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Intrinsic rotation of a page, normalised at the boundary.
///
/// Absent, non-numeric, or non-quarter-turn values all read as zero.
pub(crate) fn rotation_of(document: &Document, page_id: ObjectId) -> Rotation {
    let degrees = match inherited_attribute(document, page_id, b"Rotate").map(|o| resolve(document, o)) {
        None => return Rotation::ZERO,
        Some(Object::Integer(value)) => *value,
        Some(Object::Real(value)) => value.round() as i64,
        Some(other) => {
            warn!(?page_id, ?other, "non-numeric /Rotate, treating as 0");
            return Rotation::ZERO;
        }
    };
    Rotation::from_degrees(degrees).unwrap_or_else(|| {
        warn!(?page_id, degrees, "/Rotate is not a multiple of 90, treating as 0");
        Rotation::ZERO
    })
}

/// Whether an object is a `/Page` or `/Pages` node.
pub(crate) fn is_page_tree_node(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => {
            matches!(dict.get(b"Type"), Ok(Object::Name(name)) if name == b"Page" || name == b"Pages")
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Source documents
// ---------------------------------------------------------------------------

/// A loaded, read-only document whose pages can be copied elsewhere.
pub struct SourceDocument {
    document: Document,
    /// Page object IDs in page order (index 0 is the first page).
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Parse raw PDF bytes.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn load(bytes: &[u8], options: &CodecOptions) -> Result<Self> {
        let document = load_document(bytes, options)?;
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(pages = page_ids.len(), "PDF loaded");
        Ok(Self { document, page_ids })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Intrinsic rotation of the page at `index`.
    pub fn rotation_angle(&self, index: usize) -> Result<Rotation> {
        Ok(rotation_of(&self.document, self.page_id(index)?))
    }

    /// Intrinsic rotations of every page, in page order.
    pub fn rotations(&self) -> Vec<Rotation> {
        self.page_ids
            .iter()
            .map(|&id| rotation_of(&self.document, id))
            .collect()
    }

    pub(crate) fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            PagewerkError::codec(
                "look up page",
                format!(
                    "page index {index} out of range (document has {} pages)",
                    self.page_ids.len()
                ),
            )
        })
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }
}

// ---------------------------------------------------------------------------
// Destination documents
// ---------------------------------------------------------------------------

/// A page imported into a [`DestinationDocument`] but not necessarily added
/// to its page tree yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef(ObjectId);

/// An initially empty document assembled page by page.
pub struct DestinationDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl DestinationDocument {
    /// Create an empty document with a catalog and an empty page tree.
    pub fn new(options: &CodecOptions) -> Self {
        let mut document = Document::with_version(options.pdf_version.as_str());
        let pages_id = document.new_object_id();
        let catalog_id = document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Import the pages at `indices` of `source`, in that order.
    ///
    /// Each copy is self-contained: inherited attributes are materialised on
    /// the page and its resources are deep-copied. Objects shared between the
    /// imported pages are copied once per call.
    pub fn copy_pages(&mut self, source: &SourceDocument, indices: &[usize]) -> Result<Vec<PageRef>> {
        let mut cloner = ObjectCloner::new(source.document());
        let mut copied = Vec::with_capacity(indices.len());
        for &index in indices {
            let page_id = source.page_id(index)?;
            let new_id = cloner.clone_page(&mut self.document, page_id, self.pages_id)?;
            copied.push(PageRef(new_id));
        }
        debug!(pages = copied.len(), "pages copied");
        Ok(copied)
    }

    /// Append an imported page to the page tree.
    pub fn add_page(&mut self, page: PageRef) {
        self.kids.push(page.0);
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Current rotation of an imported page.
    pub fn rotation_angle(&self, page: PageRef) -> Rotation {
        rotation_of(&self.document, page.0)
    }

    /// Overwrite the `/Rotate` entry of an imported page.
    pub fn set_rotation(&mut self, page: PageRef, rotation: Rotation) -> Result<()> {
        let dict = self
            .document
            .get_dictionary_mut(page.0)
            .map_err(|err| PagewerkError::codec("set page rotation", err))?;
        dict.set("Rotate", Object::Integer(i64::from(rotation.degrees())));
        Ok(())
    }

    /// Write the page tree and serialise.
    pub fn save(mut self, options: &CodecOptions) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(self.kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ]);
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        save_document(&mut self.document, options, "save document")
    }
}
