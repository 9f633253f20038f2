// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deep copy of page objects between lopdf documents.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use pagewerk_core::error::{PagewerkError, Result};
use tracing::{debug, warn};

use super::codec::{INHERITABLE_KEYS, inherited_attribute, is_page_tree_node};

/// Copies pages (and every object they transitively reference) from one
/// document into another.
///
/// Objects reached from several copied pages (shared fonts, images) are
/// copied once per cloner. References to page tree nodes other than the page
/// being copied are replaced by `null` so that link destinations and parent
/// pointers do not drag foreign pages along.
pub(crate) struct ObjectCloner<'a> {
    source: &'a Document,
    /// Source object ID -> target object ID.
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCloner<'a> {
    pub(crate) fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy one page into `target`, parented under `parent`, and return the
    /// new page's object ID.
    pub(crate) fn clone_page(
        &mut self,
        target: &mut Document,
        page_id: ObjectId,
        parent: ObjectId,
    ) -> Result<ObjectId> {
        let source = self.source;
        let page = source.get_dictionary(page_id).map_err(|err| {
            PagewerkError::codec("copy pages", format!("cannot read page object {page_id:?}: {err}"))
        })?;

        // Registered while the page is being copied so that back-references
        // (an annotation's /P) land on the copy.
        let new_id = target.new_object_id();
        self.copied.insert(page_id, new_id);

        let mut dict = Dictionary::new();
        for (key, value) in page.iter() {
            if key == b"Parent" {
                continue;
            }
            dict.set(key.clone(), self.clone_object(target, value)?);
        }
        for key in INHERITABLE_KEYS {
            if dict.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page_id, key) {
                dict.set(key.to_vec(), self.clone_object(target, value)?);
            }
        }
        dict.set("Parent", Object::Reference(parent));
        target.objects.insert(new_id, Object::Dictionary(dict));

        // A later copy of the same page must get its own page object.
        self.copied.remove(&page_id);
        Ok(new_id)
    }

    fn clone_object(&mut self, target: &mut Document, object: &Object) -> Result<Object> {
        match object {
            Object::Reference(id) => self.clone_reference(target, *id),
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.clone_dictionary(target, dict)?)),
            Object::Array(items) => {
                let mut cloned = Vec::with_capacity(items.len());
                for item in items {
                    cloned.push(self.clone_object(target, item)?);
                }
                Ok(Object::Array(cloned))
            }
            Object::Stream(stream) => {
                let dict = self.clone_dictionary(target, &stream.dict)?;
                Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
            }
            // Booleans, numbers, strings, names and null copy as-is.
            other => Ok(other.clone()),
        }
    }

    fn clone_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Result<Dictionary> {
        let mut cloned = Dictionary::new();
        for (key, value) in dict.iter() {
            cloned.set(key.clone(), self.clone_object(target, value)?);
        }
        Ok(cloned)
    }

    fn clone_reference(&mut self, target: &mut Document, id: ObjectId) -> Result<Object> {
        if let Some(&existing) = self.copied.get(&id) {
            return Ok(Object::Reference(existing));
        }

        let source = self.source;
        let object = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "cannot resolve reference, using null");
                return Ok(Object::Null);
            }
        };
        if is_page_tree_node(object) {
            debug!(?id, "dropping reference to a page outside the copy");
            return Ok(Object::Null);
        }

        // Reserve the ID before descending so that cycles terminate.
        let new_id = target.new_object_id();
        self.copied.insert(id, new_id);
        let cloned = self.clone_object(target, object)?;
        target.objects.insert(new_id, cloned);
        Ok(Object::Reference(new_id))
    }
}
