// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text overlays in one of the standard Type1 fonts.

use lopdf::content::Operation;
use lopdf::{Dictionary, Object, StringFormat};
use pagewerk_core::EditorConfig;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::Rgb;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ContentMutation, Placement, require_positive};
use crate::pdf::editable::EditableDocument;

/// Distance from the top of a line box to its baseline, in ems.
const ASCENT: f32 = 0.8;
/// Baseline-to-baseline distance, in ems.
const LEADING: f32 = 1.2;

/// Standard 14 fonts every viewer ships; no embedding needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StandardFont {
    #[default]
    Helvetica,
    HelveticaBold,
    TimesRoman,
    Courier,
}

impl StandardFont {
    pub fn base_font(self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::TimesRoman => "Times-Roman",
            Self::Courier => "Courier",
        }
    }
}

/// One or more lines of text drawn with their top-left corner at
/// `placement`. Lines are split on `\n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlay {
    pub placement: Placement,
    pub text: String,
    #[serde(default)]
    pub font: StandardFont,
    /// Points; the editor default when absent.
    #[serde(default)]
    pub font_size: Option<f32>,
    #[serde(default)]
    pub color: Option<Rgb>,
}

impl ContentMutation for TextOverlay {
    fn describe(&self) -> String {
        format!("text overlay on page {}", self.placement.page)
    }

    fn apply(&self, document: &mut EditableDocument, config: &EditorConfig) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(PagewerkError::Validation("text overlay is empty".into()));
        }
        let size = self.font_size.unwrap_or(config.default_font_size);
        require_positive("font size", size)?;
        let color = self.color.unwrap_or(config.default_text_color);

        let page = self.placement.page;
        let geometry = document.geometry(page)?;

        let font_id = document.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Font".to_vec())),
            ("Subtype", Object::Name(b"Type1".to_vec())),
            ("BaseFont", Object::Name(self.font.base_font().as_bytes().to_vec())),
            ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
        ]));
        let font_name = document.add_page_resource(page, b"Font", "PwF", Object::Reference(font_id))?;

        let [a, b, c, d] = geometry.upright_basis();
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font_name), Object::Real(size)]),
            Operation::new(
                "rg",
                vec![Object::Real(color.r), Object::Real(color.g), Object::Real(color.b)],
            ),
        ];
        for (line_index, line) in self.text.split('\n').enumerate() {
            let baseline = self.placement.y + size * (ASCENT + LEADING * line_index as f32);
            let (e, f) = geometry.to_user_space(self.placement.x, baseline);
            operations.push(Operation::new(
                "Tm",
                [a, b, c, d, e, f].into_iter().map(Object::Real).collect(),
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        debug!(page, size, lines = self.text.split('\n').count(), "drawing text overlay");
        document.append_content(page, operations)
    }
}

/// Encode text for a WinAnsiEncoding simple font. Characters outside the
/// encoding become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (' '..='~').contains(&c) || ('\u{A0}'..='\u{FF}').contains(&c) => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::pdf::codec::CodecOptions;

    fn overlay(page: u32, text: &str) -> TextOverlay {
        TextOverlay {
            placement: Placement {
                page,
                x: 72.0,
                y: 72.0,
            },
            text: text.into(),
            font: StandardFont::HelveticaBold,
            font_size: Some(18.0),
            color: None,
        }
    }

    #[test]
    fn win_ansi_maps_typographic_marks() {
        assert_eq!(encode_win_ansi("A\u{2013}\u{00E9}"), vec![b'A', 0x96, 0xE9]);
        assert_eq!(encode_win_ansi("\u{4E2D}"), vec![b'?']);
        assert_eq!(encode_win_ansi("a\r"), vec![b'a']);
    }

    #[test]
    fn text_is_drawn_on_the_requested_page() {
        let options = CodecOptions::default();
        let config = EditorConfig::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(2), &options).unwrap();
        overlay(2, "Approved\nby QA").apply(&mut document, &config).unwrap();
        let (bytes, _) = document.save(&options).unwrap();

        let shown: Vec<Vec<u8>> = fixtures::page_operations(&bytes, 1)
            .into_iter()
            .filter(|op| op.operator == "Tj")
            .map(|op| op.operands[0].as_str().unwrap().to_vec())
            .collect();
        assert!(shown.contains(&b"Approved".to_vec()));
        assert!(shown.contains(&b"by QA".to_vec()));
        let first = String::from_utf8_lossy(&fixtures::page_content(&bytes, 0)).into_owned();
        assert!(!first.contains("Approved"));
    }

    #[test]
    fn empty_text_is_rejected() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(1), &options).unwrap();
        let err = overlay(1, "  ").apply(&mut document, &EditorConfig::default()).unwrap_err();
        assert!(matches!(err, PagewerkError::Validation(_)));
    }

    #[test]
    fn missing_page_is_rejected() {
        let options = CodecOptions::default();
        let mut document = EditableDocument::load(&fixtures::sample_pdf(1), &options).unwrap();
        assert!(overlay(2, "x").apply(&mut document, &EditorConfig::default()).is_err());
    }
}
