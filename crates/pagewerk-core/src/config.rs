// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Rgb;

/// File name looked up inside the configuration directory.
pub const CONFIG_FILE: &str = "config.json";

/// Settings shared by every edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// PDF header version written into rebuilt documents.
    pub pdf_version: String,
    /// Flate-compress uncompressed streams when serialising.
    pub compress_output: bool,
    /// Refuse to ingest encrypted documents (they cannot be written back
    /// encrypted).
    pub reject_encrypted: bool,
    /// Upper bound on ingested document size, in bytes.
    pub max_input_bytes: Option<usize>,
    /// Font size for text overlays that do not specify one.
    pub default_font_size: f32,
    /// Fill colour for text overlays that do not specify one.
    pub default_text_color: Rgb,
    /// Line width for vector signatures, in points.
    pub signature_stroke_width: f32,
    /// Luma at or above which a signature image pixel is treated as paper.
    pub signature_ink_threshold: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pdf_version: "1.7".into(),
            compress_output: true,
            reject_encrypted: true,
            max_input_bytes: Some(256 * 1024 * 1024),
            default_font_size: 12.0,
            default_text_color: Rgb::BLACK,
            signature_stroke_width: 1.5,
            signature_ink_threshold: 200,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults; a file that exists but does not
    /// parse is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "pdf_version": "1.5", "compress_output": false }"#).unwrap();
        assert_eq!(config.pdf_version, "1.5");
        assert!(!config.compress_output);
        assert!(config.reject_encrypted);
        assert_eq!(config.default_font_size, 12.0);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = EditorConfig::load("/nonexistent/pagewerk/config.json").unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
