// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Visual signatures — captured pen strokes or a photographed signature,
// fitted into a box on the page. These carry no cryptographic meaning.

use ::image::RgbaImage;
use ::image::imageops;
use lopdf::Object;
use lopdf::content::Operation;
use pagewerk_core::EditorConfig;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::Rgb;
use tracing::debug;

use super::image::{decode_rgba, draw_xobject, embed_rgba};
use super::{ContentMutation, Placement, require_positive};
use crate::pdf::editable::EditableDocument;

/// The signature itself.
#[derive(Debug, Clone, PartialEq)]
pub enum SignatureInk {
    /// Pen strokes as polylines, in any coordinate system with y growing
    /// downwards. They are scaled uniformly to fit the box.
    Strokes(Vec<Vec<(f32, f32)>>),
    /// An encoded image of ink on a light background. The background is
    /// keyed out and the image trimmed to the ink.
    Image(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureOverlay {
    pub placement: Placement,
    /// Box the signature is fitted into, in points. The ink keeps its
    /// aspect ratio and is centred.
    pub width: f32,
    pub height: f32,
    pub ink: SignatureInk,
    /// Stroke colour; the editor's text colour when absent.
    pub color: Option<Rgb>,
    /// Stroke width in points; the editor default when absent.
    pub stroke_width: Option<f32>,
}

impl ContentMutation for SignatureOverlay {
    fn describe(&self) -> String {
        format!("signature on page {}", self.placement.page)
    }

    fn apply(&self, document: &mut EditableDocument, config: &EditorConfig) -> Result<()> {
        require_positive("signature width", self.width)?;
        require_positive("signature height", self.height)?;
        match &self.ink {
            SignatureInk::Strokes(strokes) => self.draw_strokes(document, config, strokes),
            SignatureInk::Image(bytes) => self.draw_image(document, config, bytes),
        }
    }
}

impl SignatureOverlay {
    fn draw_strokes(
        &self,
        document: &mut EditableDocument,
        config: &EditorConfig,
        strokes: &[Vec<(f32, f32)>],
    ) -> Result<()> {
        let bounds = Bounds::of(strokes.iter().flatten().copied())
            .ok_or_else(|| PagewerkError::Validation("signature has no strokes".into()))?;
        let stroke_width = self.stroke_width.unwrap_or(config.signature_stroke_width);
        require_positive("stroke width", stroke_width)?;
        let color = self.color.unwrap_or(config.default_text_color);

        let page = self.placement.page;
        let geometry = document.geometry(page)?;
        let fit = Fit::new(self.width, self.height, bounds.width(), bounds.height());

        let to_page = |(x, y): (f32, f32)| {
            geometry.to_user_space(
                self.placement.x + fit.offset_x + (x - bounds.min_x) * fit.scale,
                self.placement.y + fit.offset_y + (y - bounds.min_y) * fit.scale,
            )
        };

        let mut operations = vec![
            Operation::new(
                "RG",
                vec![Object::Real(color.r), Object::Real(color.g), Object::Real(color.b)],
            ),
            Operation::new("w", vec![Object::Real(stroke_width)]),
            Operation::new("J", vec![Object::Integer(1)]),
            Operation::new("j", vec![Object::Integer(1)]),
        ];
        for stroke in strokes.iter().filter(|stroke| !stroke.is_empty()) {
            let (x, y) = to_page(stroke[0]);
            operations.push(Operation::new("m", vec![Object::Real(x), Object::Real(y)]));
            // A single point still needs a segment to render as a dot.
            let rest = if stroke.len() == 1 { &stroke[..] } else { &stroke[1..] };
            for &point in rest {
                let (x, y) = to_page(point);
                operations.push(Operation::new("l", vec![Object::Real(x), Object::Real(y)]));
            }
        }
        operations.push(Operation::new("S", vec![]));

        debug!(page, strokes = strokes.len(), "drawing signature strokes");
        document.append_content(page, operations)
    }

    fn draw_image(&self, document: &mut EditableDocument, config: &EditorConfig, bytes: &[u8]) -> Result<()> {
        let raster = decode_rgba(bytes)?;
        let ink = key_out_background(raster, config.signature_ink_threshold)
            .ok_or_else(|| PagewerkError::Validation("signature image contains no ink".into()))?;

        let fit = Fit::new(self.width, self.height, ink.width() as f32, ink.height() as f32);
        let placement = Placement {
            x: self.placement.x + fit.offset_x,
            y: self.placement.y + fit.offset_y,
            ..self.placement
        };
        let xobject = embed_rgba(document, &ink);
        debug!(page = placement.page, "drawing signature image");
        draw_xobject(
            document,
            placement,
            ink.width() as f32 * fit.scale,
            ink.height() as f32 * fit.scale,
            xobject,
        )
    }
}

/// Make pixels at least as light as `threshold` transparent and crop to the
/// remaining ink. `None` when nothing is left.
fn key_out_background(mut raster: RgbaImage, threshold: u8) -> Option<RgbaImage> {
    let mut ink: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in raster.enumerate_pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = (299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000;
        if a == 0 || luma >= u32::from(threshold) {
            pixel.0[3] = 0;
            continue;
        }
        ink = Some(match ink {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = ink?;
    Some(imageops::crop_imm(&raster, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image())
}

struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    fn of(points: impl Iterator<Item = (f32, f32)>) -> Option<Self> {
        points.fold(None, |bounds, (x, y)| {
            Some(match bounds {
                None => Self {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(b) => Self {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }

    fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Uniform scale and centring offsets fitting content into a box.
#[derive(Debug, PartialEq)]
struct Fit {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl Fit {
    fn new(box_width: f32, box_height: f32, content_width: f32, content_height: f32) -> Self {
        let scales = [(box_width, content_width), (box_height, content_height)]
            .into_iter()
            .filter(|&(_, content)| content > 0.0)
            .map(|(available, content)| available / content);
        let scale = scales.fold(f32::INFINITY, f32::min);
        // Degenerate content (a single dot) is drawn at its natural size.
        let scale = if scale.is_finite() { scale } else { 1.0 };
        Self {
            scale,
            offset_x: (box_width - content_width * scale) / 2.0,
            offset_y: (box_height - content_height * scale) / 2.0,
        }
    }
}
