// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pagewerk page editor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PagewerkError, Result};

/// Unique identifier for an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page rotation, always one of 0, 90, 180 or 270 degrees clockwise.
///
/// Used both for a page's intrinsic `/Rotate` value and for the additional
/// delta tracked by the rotation ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u16")]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Rotation = Rotation(0);
    pub const QUARTER: Rotation = Rotation(90);
    pub const HALF: Rotation = Rotation(180);
    pub const THREE_QUARTERS: Rotation = Rotation(270);

    /// Normalise an arbitrary angle into `[0, 360)`.
    ///
    /// Returns `None` when the angle is not a multiple of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        Some(Self(degrees.rem_euclid(360) as u16))
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two rotations modulo 360.
    pub fn compose(self, other: Rotation) -> Rotation {
        Rotation((self.0 + other.0) % 360)
    }

    /// Whether the rotation swaps a page's displayed width and height.
    pub fn is_sideways(self) -> bool {
        self.0 == 90 || self.0 == 270
    }
}

impl TryFrom<i64> for Rotation {
    type Error = PagewerkError;

    fn try_from(degrees: i64) -> Result<Self> {
        Rotation::from_degrees(degrees).ok_or_else(|| {
            PagewerkError::Validation(format!("rotation must be a multiple of 90, got {degrees}"))
        })
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.0
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\u{00B0}", self.0)
    }
}

/// A single quarter-turn step requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotateStep {
    /// +90 degrees.
    Clockwise,
    /// -90 degrees.
    CounterClockwise,
}

impl RotateStep {
    /// The step expressed as a normalised rotation delta.
    pub fn as_rotation(self) -> Rotation {
        match self {
            Self::Clockwise => Rotation::QUARTER,
            Self::CounterClockwise => Rotation::THREE_QUARTERS,
        }
    }
}

impl TryFrom<i32> for RotateStep {
    type Error = PagewerkError;

    fn try_from(degrees: i32) -> Result<Self> {
        match degrees {
            90 => Ok(Self::Clockwise),
            -90 => Ok(Self::CounterClockwise),
            other => Err(PagewerkError::Validation(format!(
                "rotation step must be 90 or -90, got {other}"
            ))),
        }
    }
}

/// Page range specification, 1-indexed and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Check `1 <= start <= end <= page_count`.
    pub fn validate(&self, page_count: usize) -> Result<()> {
        if self.start == 0 || self.start > self.end || self.end as usize > page_count {
            return Err(PagewerkError::InvalidRange {
                start: self.start,
                end: self.end,
                page_count,
            });
        }
        Ok(())
    }

    /// The range as 0-indexed page indices. Call [`PageRange::validate`]
    /// first; a range that would fail it yields no indices.
    pub fn indices(&self) -> std::ops::Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        (self.start as usize - 1)..(self.end as usize)
    }

    pub fn len(&self) -> usize {
        self.indices().len()
    }

    /// True for a reversed range or one starting at page 0.
    pub fn is_empty(&self) -> bool {
        self.start == 0 || self.start > self.end
    }
}

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PagewerkError::Validation(format!(
                "colour must look like #RRGGBB, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| -> Result<f32> {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f32::from(v) / 255.0)
                .map_err(|err| PagewerkError::Validation(format!("bad colour {hex:?}: {err}")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_normalises_negative_angles() {
        assert_eq!(Rotation::from_degrees(-90), Some(Rotation::THREE_QUARTERS));
        assert_eq!(Rotation::from_degrees(450), Some(Rotation::QUARTER));
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn four_quarter_turns_wrap_to_zero() {
        let mut rotation = Rotation::ZERO;
        let mut seen = Vec::new();
        for _ in 0..4 {
            rotation = rotation.compose(RotateStep::Clockwise.as_rotation());
            seen.push(rotation.degrees());
        }
        assert_eq!(seen, vec![90, 180, 270, 0]);
    }

    #[test]
    fn rotate_step_rejects_other_angles() {
        assert_eq!(RotateStep::try_from(90).unwrap(), RotateStep::Clockwise);
        assert_eq!(RotateStep::try_from(-90).unwrap(), RotateStep::CounterClockwise);
        assert!(RotateStep::try_from(180).is_err());
    }

    #[test]
    fn rotation_deserialises_from_any_quarter_angle() {
        let rotation: Rotation = serde_json::from_str("-90").unwrap();
        assert_eq!(rotation, Rotation::THREE_QUARTERS);
        assert!(serde_json::from_str::<Rotation>("30").is_err());
        assert_eq!(serde_json::to_string(&Rotation::HALF).unwrap(), "180");
    }

    #[test]
    fn page_range_bounds() {
        assert!(PageRange::new(1, 1).validate(5).is_ok());
        assert!(PageRange::new(1, 5).validate(5).is_ok());
        assert!(PageRange::new(3, 2).validate(5).is_err());
        assert!(PageRange::new(0, 2).validate(5).is_err());
        assert!(PageRange::new(2, 6).validate(5).is_err());
        assert_eq!(PageRange::new(2, 4).indices(), 1..4);
        assert_eq!(PageRange::new(2, 4).len(), 3);
    }

    #[test]
    fn unvalidated_ranges_are_empty() {
        assert_eq!(PageRange::new(0, 3).indices(), 0..0);
        assert_eq!(PageRange::new(3, 2).len(), 0);
        assert!(PageRange::new(3, 2).is_empty());
        assert!(!PageRange::new(1, 1).is_empty());
    }

    #[test]
    fn hex_colours() {
        let red = Rgb::from_hex("#FF0000").unwrap();
        assert_eq!((red.r, red.g, red.b), (1.0, 0.0, 0.0));
        assert!(Rgb::from_hex("12345").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
    }
}
