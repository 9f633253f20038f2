// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mutable documents — reopened baselines that content mutations draw on.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::Rotation;
use tracing::{debug, instrument};

use super::codec::{CodecOptions, inherited_attribute, load_document, number, resolve, rotation_of, save_document};

/// US Letter, used when a page has no readable box.
const DEFAULT_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Where a page sits in user space and how it is turned for display.
///
/// Callers place content in *displayed* coordinates: origin at the top-left
/// corner of the page as a viewer shows it (after `/Rotate`), y growing
/// downwards, in points. The codec's user space has its origin at the
/// bottom-left of the unrotated box with y growing upwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Lower-left corner of the visible box in user space.
    pub x0: f32,
    pub y0: f32,
    /// Unrotated box size.
    pub width: f32,
    pub height: f32,
    /// Intrinsic page rotation.
    pub rotation: Rotation,
}

impl PageGeometry {
    /// Size of the page as displayed.
    pub fn display_size(&self) -> (f32, f32) {
        if self.rotation.is_sideways() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Convert a top-left-origin displayed point into user space.
    pub fn to_user_space(&self, x: f32, y: f32) -> (f32, f32) {
        let (u, v) = match self.rotation.degrees() {
            90 => (y, x),
            180 => (self.width - x, y),
            270 => (self.width - y, self.height - x),
            _ => (x, self.height - y),
        };
        (self.x0 + u, self.y0 + v)
    }

    /// Linear part of the matrix that keeps drawn content upright on screen:
    /// `(a, b)` is the displayed rightward direction and `(c, d)` the
    /// displayed upward direction, both in user space.
    pub fn upright_basis(&self) -> [f32; 4] {
        match self.rotation.degrees() {
            90 => [0.0, 1.0, -1.0, 0.0],
            180 => [-1.0, 0.0, 0.0, -1.0],
            270 => [0.0, -1.0, 1.0, 0.0],
            _ => [1.0, 0.0, 0.0, 1.0],
        }
    }

    /// Full `cm`/`Tm` operands placing a `width` x `height` unit box whose
    /// displayed top-left corner is at `(x, y)`.
    pub fn placement_matrix(&self, x: f32, y: f32, width: f32, height: f32) -> [f32; 6] {
        let [a, b, c, d] = self.upright_basis();
        let (e, f) = self.to_user_space(x, y + height);
        [a * width, b * width, c * height, d * height, e, f]
    }
}

/// A document reopened for content mutation.
pub struct EditableDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
    /// Counter for generated resource names.
    next_resource: usize,
}

impl EditableDocument {
    /// Parse bytes into a mutable handle.
    #[instrument(skip_all, fields(bytes_len = bytes.len()))]
    pub fn load(bytes: &[u8], options: &CodecOptions) -> Result<Self> {
        let document = load_document(bytes, options)?;
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(pages = page_ids.len(), "PDF reopened for editing");
        Ok(Self {
            document,
            page_ids,
            next_resource: 0,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Page object of a 1-indexed page number.
    fn page_id(&self, page_number: u32) -> Result<ObjectId> {
        let index = (page_number as usize).checked_sub(1);
        index
            .and_then(|index| self.page_ids.get(index).copied())
            .ok_or_else(|| {
                PagewerkError::Validation(format!(
                    "page {page_number} out of range (document has {} pages)",
                    self.page_ids.len()
                ))
            })
    }

    /// Geometry of a 1-indexed page. The crop box wins over the media box
    /// because that is what viewers display.
    pub fn geometry(&self, page_number: u32) -> Result<PageGeometry> {
        let page_id = self.page_id(page_number)?;
        let rect = page_box(&self.document, page_id, b"CropBox")
            .or_else(|| page_box(&self.document, page_id, b"MediaBox"))
            .unwrap_or(DEFAULT_BOX);

        Ok(PageGeometry {
            x0: rect[0].min(rect[2]),
            y0: rect[1].min(rect[3]),
            width: (rect[2] - rect[0]).abs(),
            height: (rect[3] - rect[1]).abs(),
            rotation: rotation_of(&self.document, page_id),
        })
    }

    /// Add an indirect object (an image, a font) to the document.
    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.document.add_object(object)
    }

    /// Register `object` under a fresh name in the page's `category`
    /// resource dictionary (`Font`, `XObject`, ...) and return the name.
    ///
    /// The page gets its own copy of its resource dictionary first, so
    /// resources shared with other pages are never modified.
    pub fn add_page_resource(
        &mut self,
        page_number: u32,
        category: &[u8],
        prefix: &str,
        object: Object,
    ) -> Result<Vec<u8>> {
        let page_id = self.page_id(page_number)?;

        let mut resources = match inherited_attribute(&self.document, page_id, b"Resources")
            .map(|o| resolve(&self.document, o))
        {
            Some(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };
        let mut entries = match resources.get(category).map(|o| resolve(&self.document, o)) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            _ => Dictionary::new(),
        };

        let name = loop {
            self.next_resource += 1;
            let candidate = format!("{prefix}{}", self.next_resource).into_bytes();
            if !entries.has(&candidate) {
                break candidate;
            }
        };
        entries.set(name.clone(), object);
        resources.set(category.to_vec(), Object::Dictionary(entries));

        let page = self
            .document
            .get_dictionary_mut(page_id)
            .map_err(|err| PagewerkError::codec("update page resources", err))?;
        page.set("Resources", Object::Dictionary(resources));
        Ok(name)
    }

    /// Draw `operations` on top of the page's existing content.
    ///
    /// The existing content is bracketed in `q`/`Q` so that graphics state it
    /// leaves behind cannot leak into the new drawing.
    pub fn append_content(&mut self, page_number: u32, operations: Vec<Operation>) -> Result<()> {
        let page_id = self.page_id(page_number)?;

        let mut wrapped = vec![Operation::new("Q", vec![]), Operation::new("q", vec![])];
        wrapped.extend(operations);
        wrapped.push(Operation::new("Q", vec![]));
        let encoded = Content { operations: wrapped }
            .encode()
            .map_err(|err| PagewerkError::codec("encode page content", err))?;

        let prefix_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let overlay_id = self
            .document
            .add_object(Stream::new(Dictionary::new(), encoded));

        let mut contents = vec![Object::Reference(prefix_id)];
        contents.extend(self.existing_contents(page_id));
        contents.push(Object::Reference(overlay_id));

        let page = self
            .document
            .get_dictionary_mut(page_id)
            .map_err(|err| PagewerkError::codec("update page content", err))?;
        page.set("Contents", Object::Array(contents));
        Ok(())
    }

    /// The page's content streams as entries for a `/Contents` array. An
    /// indirect array is spliced in element by element.
    fn existing_contents(&self, page_id: ObjectId) -> Vec<Object> {
        let Ok(page) = self.document.get_dictionary(page_id) else {
            return Vec::new();
        };
        match page.get(b"Contents") {
            Ok(Object::Reference(existing)) => match self.document.get_object(*existing) {
                Ok(Object::Array(streams)) => streams.clone(),
                Ok(_) => vec![Object::Reference(*existing)],
                Err(_) => Vec::new(),
            },
            Ok(Object::Array(streams)) => streams.clone(),
            _ => Vec::new(),
        }
    }

    /// Serialise, returning the bytes and the page count of the written
    /// document.
    pub fn save(mut self, options: &CodecOptions) -> Result<(Vec<u8>, usize)> {
        let page_count = self.document.get_pages().len();
        let bytes = save_document(&mut self.document, options, "save edited document")?;
        Ok((bytes, page_count))
    }
}

/// A page box read through inheritance, or `None` when absent or malformed.
fn page_box(document: &Document, page_id: ObjectId, key: &[u8]) -> Option<[f32; 4]> {
    let object = resolve(document, inherited_attribute(document, page_id, key)?);
    let Object::Array(items) = object else {
        return None;
    };
    if items.len() != 4 {
        return None;
    }
    let mut rect = [0.0f32; 4];
    for (slot, item) in rect.iter_mut().zip(items) {
        *slot = number(resolve(document, item))?;
    }
    Some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn geometry(rotation: u16) -> PageGeometry {
        PageGeometry {
            x0: 0.0,
            y0: 0.0,
            width: 600.0,
            height: 800.0,
            rotation: Rotation::from_degrees(i64::from(rotation)).unwrap(),
        }
    }

    #[test]
    fn unrotated_flips_y() {
        let g = geometry(0);
        assert_eq!(g.to_user_space(0.0, 0.0), (0.0, 800.0));
        assert_eq!(g.to_user_space(100.0, 50.0), (100.0, 750.0));
        assert_eq!(g.display_size(), (600.0, 800.0));
    }

    #[test]
    fn displayed_top_left_maps_to_the_right_corner() {
        // The displayed top-left corner of a turned page is a different
        // corner of the unrotated box each time.
        assert_eq!(geometry(90).to_user_space(0.0, 0.0), (0.0, 0.0));
        assert_eq!(geometry(180).to_user_space(0.0, 0.0), (600.0, 0.0));
        assert_eq!(geometry(270).to_user_space(0.0, 0.0), (600.0, 800.0));
        assert_eq!(geometry(90).display_size(), (800.0, 600.0));
    }

    #[test]
    fn displayed_bottom_right_maps_to_opposite_corner() {
        let g = geometry(90);
        let (w, h) = g.display_size();
        assert_eq!(g.to_user_space(w, h), (600.0, 800.0));
        let g = geometry(270);
        let (w, h) = g.display_size();
        assert_eq!(g.to_user_space(w, h), (0.0, 0.0));
    }

    #[test]
    fn box_origin_is_honoured() {
        let g = PageGeometry {
            x0: 10.0,
            y0: 20.0,
            ..geometry(0)
        };
        assert_eq!(g.to_user_space(0.0, 0.0), (10.0, 820.0));
    }

    #[test]
    fn placement_matrix_for_upright_page() {
        let g = geometry(0);
        assert_eq!(
            g.placement_matrix(50.0, 100.0, 200.0, 80.0),
            [200.0, 0.0, 0.0, 80.0, 50.0, 620.0]
        );
    }

    #[test]
    fn geometry_reads_boxes_and_rotation() {
        let bytes = fixtures::sample_pdf_with_rotations(&[0, 90]);
        let document = EditableDocument::load(&bytes, &CodecOptions::default()).unwrap();
        let second = document.geometry(2).unwrap();
        assert_eq!(second.width, 601.0);
        assert_eq!(second.height, 800.0);
        assert_eq!(second.rotation, Rotation::QUARTER);
        assert!(document.geometry(3).is_err());
        assert!(document.geometry(0).is_err());
    }

    #[test]
    fn appended_content_lands_after_existing_content() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(2), &options).unwrap();
        document
            .append_content(2, vec![Operation::new("n", vec![])])
            .unwrap();
        let (bytes, pages) = document.save(&options).unwrap();
        assert_eq!(pages, 2);

        let content = String::from_utf8_lossy(&fixtures::page_content(&bytes, 1)).into_owned();
        let original = content.find("Page 2").unwrap();
        let appended = content.rfind('n').unwrap();
        assert!(content.trim_start().starts_with('q'));
        assert!(appended > original);
        assert!(!String::from_utf8_lossy(&fixtures::page_content(&bytes, 0)).contains("\nn"));
    }

    #[test]
    fn indirect_contents_array_is_spliced() {
        let options = CodecOptions::default();
        let bytes = fixtures::sample_pdf_with_indirect_contents(1);
        let mut document = EditableDocument::load(&bytes, &options).unwrap();
        document
            .append_content(1, vec![Operation::new("n", vec![])])
            .unwrap();
        let (bytes, _) = document.save(&options).unwrap();

        let operators: Vec<String> = fixtures::page_operations(&bytes, 0)
            .into_iter()
            .map(|op| op.operator)
            .collect();
        let shown = operators.iter().position(|op| op == "Tj").unwrap();
        let drawn = operators.iter().position(|op| op == "n").unwrap();
        assert_eq!(operators.first().map(String::as_str), Some("q"));
        assert!(shown < drawn);
        assert_eq!(operators.last().map(String::as_str), Some("Q"));
    }

    #[test]
    fn resources_get_unique_names_per_page() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(2), &options).unwrap();
        let first = document
            .add_page_resource(1, b"Font", "PwF", Object::Null)
            .unwrap();
        let second = document
            .add_page_resource(1, b"Font", "PwF", Object::Null)
            .unwrap();
        assert_ne!(first, second);
    }
}
