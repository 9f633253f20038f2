// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster image overlays and the image XObject plumbing they share with
// signatures.

use ::image::RgbaImage;
use lopdf::content::Operation;
use lopdf::{Dictionary, Object, ObjectId, Stream};
use pagewerk_core::EditorConfig;
use pagewerk_core::error::{PagewerkError, Result};
use tracing::debug;

use super::{ContentMutation, Placement, require_positive};
use crate::pdf::editable::EditableDocument;

/// An encoded raster image (PNG, JPEG, ...) drawn with its top-left corner at
/// `placement`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay {
    pub placement: Placement,
    /// Encoded image bytes in any format the `image` crate decodes.
    pub image: Vec<u8>,
    /// Drawn width in points.
    pub width: f32,
    /// Drawn height in points; derived from the aspect ratio when absent.
    pub height: Option<f32>,
}

impl ContentMutation for ImageOverlay {
    fn describe(&self) -> String {
        format!("image overlay on page {}", self.placement.page)
    }

    fn apply(&self, document: &mut EditableDocument, _config: &EditorConfig) -> Result<()> {
        require_positive("image width", self.width)?;
        let raster = decode_rgba(&self.image)?;
        let height = match self.height {
            Some(height) => height,
            None => self.width * raster.height() as f32 / raster.width() as f32,
        };
        require_positive("image height", height)?;

        let xobject = embed_rgba(document, &raster);
        draw_xobject(document, self.placement, self.width, height, xobject)
    }
}

/// Decode an encoded image into 8-bit RGBA.
pub(crate) fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage> {
    let decoded = ::image::load_from_memory(bytes)
        .map_err(|err| PagewerkError::ImageError(format!("cannot decode image: {err}")))?;
    let rgba = decoded.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(PagewerkError::ImageError("image has no pixels".into()));
    }
    Ok(rgba)
}

/// Add an RGBA raster as an image XObject, with a soft mask when any pixel
/// is not fully opaque. Returns the XObject's ID.
pub(crate) fn embed_rgba(document: &mut EditableDocument, raster: &RgbaImage) -> ObjectId {
    let (width, height) = raster.dimensions();
    let pixel_count = width as usize * height as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in raster.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let mut dict = image_dictionary(width, height, b"DeviceRGB");
    if alpha.iter().any(|&a| a < u8::MAX) {
        let mask_id = document.add_object(Stream::new(image_dictionary(width, height, b"DeviceGray"), alpha));
        dict.set("SMask", Object::Reference(mask_id));
    }
    debug!(width, height, masked = dict.has(b"SMask"), "embedding image");
    document.add_object(Stream::new(dict, rgb))
}

fn image_dictionary(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(width))),
        ("Height", Object::Integer(i64::from(height))),
        ("ColorSpace", Object::Name(color_space.to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
    ])
}

/// Paint an image XObject into a `width` x `height` box whose displayed
/// top-left corner is `placement`.
pub(crate) fn draw_xobject(
    document: &mut EditableDocument,
    placement: Placement,
    width: f32,
    height: f32,
    xobject: ObjectId,
) -> Result<()> {
    let page = placement.page;
    let geometry = document.geometry(page)?;
    let name = document.add_page_resource(page, b"XObject", "PwIm", Object::Reference(xobject))?;

    let matrix = geometry.placement_matrix(placement.x, placement.y, width, height);
    document.append_content(
        page,
        vec![
            Operation::new("q", vec![]),
            Operation::new("cm", matrix.into_iter().map(Object::Real).collect()),
            Operation::new("Do", vec![Object::Name(name)]),
            Operation::new("Q", vec![]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::pdf::codec::CodecOptions;

    fn overlay(image: Vec<u8>, height: Option<f32>) -> ImageOverlay {
        ImageOverlay {
            placement: Placement {
                page: 1,
                x: 10.0,
                y: 10.0,
            },
            image,
            width: 100.0,
            height,
        }
    }

    #[test]
    fn undecodable_bytes_are_an_image_error() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(1), &options).unwrap();
        let err = overlay(b"not an image".to_vec(), None)
            .apply(&mut document, &EditorConfig::default())
            .unwrap_err();
        assert!(matches!(err, PagewerkError::ImageError(_)));
    }

    #[test]
    fn image_is_painted_on_the_page() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(1), &options).unwrap();
        overlay(fixtures::sample_png(4, 2, [200, 10, 10, 255]), None)
            .apply(&mut document, &EditorConfig::default())
            .unwrap();
        let (bytes, _) = document.save(&options).unwrap();

        let operations = fixtures::page_operations(&bytes, 0);
        let paint = operations.iter().find(|op| op.operator == "Do").unwrap();
        assert_eq!(paint.operands[0].as_name().unwrap(), b"PwIm1");
        // 4x2 image at width 100 keeps its 2:1 aspect ratio.
        let placement = operations.iter().rfind(|op| op.operator == "cm").unwrap();
        assert_eq!(
            fixtures::numbers(&placement.operands),
            vec![100.0, 0.0, 0.0, 50.0, 10.0, 740.0]
        );
    }

    #[test]
    fn transparency_adds_a_soft_mask() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(1), &options).unwrap();
        let opaque = decode_rgba(&fixtures::sample_png(2, 2, [0, 0, 0, 255])).unwrap();
        let translucent = decode_rgba(&fixtures::sample_png(2, 2, [0, 0, 0, 128])).unwrap();
        let opaque_id = embed_rgba(&mut document, &opaque);
        let translucent_id = embed_rgba(&mut document, &translucent);
        let (bytes, _) = document.save(&options).unwrap();

        let saved = lopdf::Document::load_mem(&bytes).unwrap();
        let smask = |id| {
            saved
                .get_object(id)
                .unwrap()
                .as_stream()
                .unwrap()
                .dict
                .has(b"SMask")
        };
        assert!(!smask(opaque_id));
        assert!(smask(translucent_id));
    }

    #[test]
    fn zero_width_is_rejected() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(1), &options).unwrap();
        let mut image = overlay(fixtures::sample_png(1, 1, [0, 0, 0, 255]), Some(10.0));
        image.width = 0.0;
        assert!(matches!(
            image.apply(&mut document, &EditorConfig::default()),
            Err(PagewerkError::Validation(_))
        ));
    }
}
