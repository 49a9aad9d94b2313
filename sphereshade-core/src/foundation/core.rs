use std::str::FromStr;

use crate::foundation::error::{SphereshadeError, SphereshadeResult};

/// Straight (non-premultiplied) RGB8 colour, used for gradient endpoints and plain backgrounds.
///
/// Serialized as `[r, g, b]`; deserialized from either `[r, g, b]` or `"#rrggbb"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Rgb8Repr", into = "[u8; 3]")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Opaque RGBA8 pixel of this colour.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl From<[u8; 3]> for Rgb8 {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Rgb8> for [u8; 3] {
    fn from(c: Rgb8) -> Self {
        c.channels()
    }
}

/// Accepts `#rrggbb`, `rrggbb` and `r,g,b`.
impl FromStr for Rgb8 {
    type Err = SphereshadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(',') {
            let parts = s
                .split(',')
                .map(|p| p.trim().parse::<u8>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SphereshadeError::validation(format!("invalid colour '{s}': {e}")))?;
            let [r, g, b] = parts[..] else {
                return Err(SphereshadeError::validation(format!(
                    "invalid colour '{s}': expected 3 comma-separated channels"
                )));
            };
            return Ok(Self::new(r, g, b));
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(SphereshadeError::validation(format!(
                "invalid colour '{s}': expected #rrggbb"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| SphereshadeError::validation(format!("invalid colour '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Rgb8Repr {
    Channels([u8; 3]),
    Hex(String),
}

impl TryFrom<Rgb8Repr> for Rgb8 {
    type Error = SphereshadeError;

    fn try_from(repr: Rgb8Repr) -> Result<Self, Self::Error> {
        match repr {
            Rgb8Repr::Channels(c) => Ok(c.into()),
            Rgb8Repr::Hex(s) => s.parse(),
        }
    }
}

/// Signed placement of a foreground's top-left corner relative to a background's top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

impl Offset {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl From<[i64; 2]> for Offset {
    fn from(v: [i64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Offset> for [i64; 2] {
    fn from(o: Offset) -> Self {
        [o.x, o.y]
    }
}

/// Point in the renderer's 3D space. Carried opaquely to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        [v.x, v.y, v.z]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

impl Canvas {
    pub fn validate(self) -> SphereshadeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SphereshadeError::validation(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

/// Viewing window handed to the sphere renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageFrame {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub distance: f64,
}

impl Default for ImageFrame {
    fn default() -> Self {
        Self {
            left: -250.0,
            right: 250.0,
            bottom: -250.0,
            top: 250.0,
            distance: 250.0,
        }
    }
}

impl ImageFrame {
    pub fn validate(&self) -> SphereshadeResult<()> {
        let all = [self.left, self.right, self.bottom, self.top, self.distance];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(SphereshadeError::validation("image frame values must be finite"));
        }
        if self.left >= self.right || self.bottom >= self.top {
            return Err(SphereshadeError::validation(
                "image frame must satisfy left < right and bottom < top",
            ));
        }
        if self.distance <= 0.0 {
            return Err(SphereshadeError::validation("image frame distance must be > 0"));
        }
        Ok(())
    }
}

/// Which axis the renderer places the sphere on; `0|1` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisSelect {
    #[default]
    Z,
    Y,
}

impl AxisSelect {
    pub fn from_flag(y_axis: bool) -> Self {
        if y_axis { Self::Y } else { Self::Z }
    }

    pub fn wire_value(self) -> u8 {
        match self {
            Self::Z => 0,
            Self::Y => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
