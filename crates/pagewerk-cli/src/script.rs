// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edit scripts — a JSON list of steps replayed against one session.
//
// Page numbers in scripts are 1-indexed against the document as it looks
// after the previous step, which is what a user sees in a viewer. Paths are
// resolved relative to the script's directory.
//
//   { "steps": [
//       { "op": "move", "from": 1, "to": 3 },
//       { "op": "rotate", "pages": [2], "degrees": -90 },
//       { "op": "delete", "pages": [4] },
//       { "op": "text", "placement": { "page": 1, "x": 72, "y": 72 }, "text": "Approved" },
//       { "op": "image", "placement": { "page": 2, "x": 40, "y": 600 }, "path": "stamp.png", "width": 120 }
//   ] }

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::types::{RotateStep, Rgb};
use pagewerk_document::{ImageOverlay, Overlay, Placement, SignatureInk, SignatureOverlay, TextOverlay};
use pagewerk_session::SharedSession;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct EditScript {
    pub steps: Vec<EditStep>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditStep {
    Move {
        from: usize,
        to: usize,
    },
    Rotate {
        pages: Vec<usize>,
        degrees: i32,
    },
    Delete {
        pages: Vec<usize>,
    },
    Text(TextOverlay),
    Image {
        placement: Placement,
        path: PathBuf,
        width: f32,
        #[serde(default)]
        height: Option<f32>,
    },
    Signature {
        placement: Placement,
        width: f32,
        height: f32,
        /// Pen strokes as lists of `[x, y]` points.
        #[serde(default)]
        strokes: Option<Vec<Vec<(f32, f32)>>>,
        /// A scanned signature, used when `strokes` is absent.
        #[serde(default)]
        image: Option<PathBuf>,
        /// `#RRGGBB`.
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        stroke_width: Option<f32>,
    },
}

impl EditScript {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let script: Self = serde_json::from_str(&data)?;
        if script.steps.is_empty() {
            return Err(PagewerkError::Validation("edit script has no steps".into()));
        }
        Ok(script)
    }

    /// Replay every step against `session`, stopping at the first failure.
    pub async fn run(self, session: &SharedSession, base_dir: &Path) -> Result<()> {
        let total = self.steps.len();
        for (index, step) in self.steps.into_iter().enumerate() {
            let label = step.label();
            step.run(session, base_dir).await.inspect_err(|err| {
                tracing::error!(step = index + 1, label, %err, "edit step failed");
            })?;
            info!(step = index + 1, total, label, "edit step applied");
        }
        Ok(())
    }
}

impl EditStep {
    fn label(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::Rotate { .. } => "rotate",
            Self::Delete { .. } => "delete",
            Self::Text(_) => "text",
            Self::Image { .. } => "image",
            Self::Signature { .. } => "signature",
        }
    }

    async fn run(self, session: &SharedSession, base_dir: &Path) -> Result<()> {
        match self {
            Self::Move { from, to } => {
                let (from, to) = (position(from)?, position(to)?);
                session.with(|s| s.reorder(from, to)).await
            }
            Self::Rotate { pages, degrees } => {
                let step = RotateStep::try_from(degrees)?;
                let positions = positions(&pages)?;
                session.with(|s| s.rotate(&positions, step)).await
            }
            Self::Delete { pages } => {
                let positions = positions(&pages)?;
                session.with(|s| s.delete(&positions).map(|_| ())).await
            }
            overlay => {
                let overlay = overlay.into_overlay(base_dir)?;
                session.apply_content_edit(overlay).await.map(|_| ())
            }
        }
    }

    fn into_overlay(self, base_dir: &Path) -> Result<Overlay> {
        let label = self.label();
        let overlay = match self {
            Self::Text(text) => Overlay::Text(text),
            Self::Image {
                placement,
                path,
                width,
                height,
            } => Overlay::Image(ImageOverlay {
                placement,
                image: std::fs::read(base_dir.join(path))?,
                width,
                height,
            }),
            Self::Signature {
                placement,
                width,
                height,
                strokes,
                image,
                color,
                stroke_width,
            } => {
                let ink = match (strokes, image) {
                    (Some(strokes), _) => SignatureInk::Strokes(strokes),
                    (None, Some(path)) => SignatureInk::Image(std::fs::read(base_dir.join(path))?),
                    (None, None) => {
                        return Err(PagewerkError::Validation(
                            "signature step needs either strokes or an image".into(),
                        ));
                    }
                };
                Overlay::Signature(SignatureOverlay {
                    placement,
                    width,
                    height,
                    ink,
                    color: color.as_deref().map(Rgb::from_hex).transpose()?,
                    stroke_width,
                })
            }
            Self::Move { .. } | Self::Rotate { .. } | Self::Delete { .. } => {
                return Err(PagewerkError::Validation(format!(
                    "{label} is not a content edit"
                )));
            }
        };
        Ok(overlay)
    }
}

/// 1-indexed page number to 0-indexed order position.
fn position(page: usize) -> Result<usize> {
    page.checked_sub(1)
        .ok_or_else(|| PagewerkError::Validation("page numbers start at 1".into()))
}

fn positions(pages: &[usize]) -> Result<BTreeSet<usize>> {
    pages.iter().map(|&page| position(page)).collect()
}
