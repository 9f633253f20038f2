// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Synthetic documents and inspection helpers for tests and benches.
//
// Every generated page carries a marker in its media box width (600 + its
// original index) so that tests can tell pages apart after any amount of
// copying, reordering, and rotation.

use std::io::Cursor;

use ::image::{ImageFormat, Rgba, RgbaImage};
use lopdf::content::{Content, Operation};
use lopdf::{
    Dictionary, Document, EncryptionState, EncryptionVersion, Object, ObjectId, Permissions, Stream,
    StringFormat,
};

use crate::pdf::codec::{inherited_attribute, number, resolve, rotation_of};

const MARKER_BASE: f32 = 600.0;

/// A `pages`-page document with no rotation.
pub fn sample_pdf(pages: usize) -> Vec<u8> {
    build(pages, |_| None, None)
}

/// One page per entry, each with that literal `/Rotate` value.
pub fn sample_pdf_with_rotations(rotations: &[i64]) -> Vec<u8> {
    build(rotations.len(), |index| Some(rotations[index]), None)
}

/// A document whose pages inherit `/Rotate` from the page tree root.
pub fn sample_pdf_with_inherited_rotation(pages: usize, degrees: i64) -> Vec<u8> {
    build(pages, |_| None, Some(degrees))
}

/// A document whose pages hold `/Contents` as a reference to an array of
/// streams rather than to a single stream.
pub fn sample_pdf_with_indirect_contents(pages: usize) -> Vec<u8> {
    let mut document = Document::load_mem(&sample_pdf(pages)).unwrap();
    let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
    for page_id in page_ids {
        let stream_id = document
            .get_dictionary(page_id)
            .unwrap()
            .get(b"Contents")
            .unwrap()
            .as_reference()
            .unwrap();
        let array_id = document.add_object(Object::Array(vec![Object::Reference(stream_id)]));
        document
            .get_dictionary_mut(page_id)
            .unwrap()
            .set("Contents", Object::Reference(array_id));
    }
    save(&mut document)
}

/// A document encrypted with RC4 and an empty user password.
pub fn sample_encrypted_pdf(pages: usize) -> Vec<u8> {
    let mut document = Document::load_mem(&sample_pdf(pages)).unwrap();
    document.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String((1..=16).collect(), StringFormat::Literal),
            Object::String((1..=16).rev().collect(), StringFormat::Literal),
        ]),
    );
    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &document,
        owner_password: "owner",
        user_password: "",
        key_length: 128,
        permissions: Permissions::all(),
    })
    .unwrap();
    document.encrypt(&state).unwrap();
    save(&mut document)
}

fn save(document: &mut Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    document.save_to(&mut bytes).unwrap();
    bytes
}

fn build(pages: usize, page_rotation: impl Fn(usize) -> Option<i64>, tree_rotation: Option<i64>) -> Vec<u8> {
    let mut document = Document::with_version("1.7");
    let pages_id = document.new_object_id();

    let font_id = document.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    let resources_id = document.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]));

    let mut kids = Vec::with_capacity(pages);
    for index in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(24)]),
                Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", index + 1).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = document.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(600 + index as i64),
                    Object::Integer(800),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
        ]);
        if let Some(degrees) = page_rotation(index) {
            page.set("Rotate", Object::Integer(degrees));
        }
        kids.push(Object::Reference(document.add_object(page)));
    }

    let mut tree = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(pages as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    if let Some(degrees) = tree_rotation {
        tree.set("Rotate", Object::Integer(degrees));
    }
    document.objects.insert(pages_id, Object::Dictionary(tree));

    let catalog_id = document.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    document.trailer.set("Root", Object::Reference(catalog_id));
    save(&mut document)
}

/// A solid-colour PNG.
pub fn sample_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let raster = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut bytes = Vec::new();
    raster
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn pages(bytes: &[u8]) -> (Document, Vec<ObjectId>) {
    let document = Document::load_mem(bytes).unwrap();
    let ids = document.get_pages().into_values().collect();
    (document, ids)
}

/// Original index of every page, in output order, read from the media box
/// marker.
pub fn page_markers(bytes: &[u8]) -> Vec<usize> {
    let (document, ids) = pages(bytes);
    ids.into_iter()
        .map(|id| {
            let media_box = resolve(&document, inherited_attribute(&document, id, b"MediaBox").unwrap());
            let width = number(resolve(&document, &media_box.as_array().unwrap()[2])).unwrap();
            (width - MARKER_BASE).round() as usize
        })
        .collect()
}

/// Effective rotation of every page in degrees, in output order.
pub fn page_rotations(bytes: &[u8]) -> Vec<u16> {
    let (document, ids) = pages(bytes);
    ids.into_iter()
        .map(|id| rotation_of(&document, id).degrees())
        .collect()
}

/// Decompressed content stream bytes of the page at 0-indexed `index`.
pub fn page_content(bytes: &[u8], index: usize) -> Vec<u8> {
    let (mut document, ids) = pages(bytes);
    document.decompress();
    document.get_page_content(ids[index]).unwrap()
}

/// Parsed content operations of the page at 0-indexed `index`.
pub fn page_operations(bytes: &[u8], index: usize) -> Vec<Operation> {
    Content::decode(&page_content(bytes, index)).unwrap().operations
}

/// Numeric operands as `f32`.
pub fn numbers(operands: &[Object]) -> Vec<f32> {
    operands.iter().map(|operand| number(operand).unwrap()).collect()
}
