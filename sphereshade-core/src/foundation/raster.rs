use crate::foundation::error::{SphereshadeError, SphereshadeResult};

/// Straight-alpha RGBA8 image buffer.
///
/// Rows are tightly packed, row-major, origin at the top-left. A `Raster` is always fully
/// populated: `data.len() == width * height * 4` and both dimensions are non-zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Wrap an existing RGBA8 buffer, checking its length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> SphereshadeResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(SphereshadeError::validation(format!(
                "rgba8 buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A raster where every pixel is `px`.
    pub fn filled(width: u32, height: u32, px: [u8; 4]) -> SphereshadeResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.stride() + x as usize * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride();
        Some(&self.data[start..start + self.stride()])
    }

    /// Copy out the largest centred square.
    ///
    /// For odd size differences the extra pixel is dropped from the right/bottom edge.
    pub fn crop_square(&self) -> Self {
        let side = self.width.min(self.height);
        if side == self.width && side == self.height {
            return self.clone();
        }
        let x0 = ((self.width - side) / 2) as usize;
        let y0 = ((self.height - side) / 2) as usize;
        let side_bytes = side as usize * 4;

        let mut data = Vec::with_capacity(side_bytes * side as usize);
        for row in self.data.chunks_exact(self.stride()).skip(y0).take(side as usize) {
            data.extend_from_slice(&row[x0 * 4..x0 * 4 + side_bytes]);
        }
        Self {
            width: side,
            height: side,
            data,
        }
    }
}

/// Per-pixel blend weight in `[0.0, 1.0]`, same dimensions as the image it weights.
#[derive(Clone, Debug, PartialEq)]
pub struct OpacityMask {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl OpacityMask {
    /// `alpha / 255` for every pixel of `raster`.
    pub fn from_alpha(raster: &Raster) -> Self {
        let values = raster
            .as_bytes()
            .chunks_exact(4)
            .map(|px| f64::from(px[3]) / 255.0)
            .collect();
        Self {
            width: raster.width(),
            height: raster.height(),
            values,
        }
    }

    /// A mask where every weight is `value` (clamped to `[0, 1]`).
    pub fn uniform(width: u32, height: u32, value: f64) -> SphereshadeResult<Self> {
        let len = byte_len(width, height)? / 4;
        if !value.is_finite() {
            return Err(SphereshadeError::validation("opacity must be finite"));
        }
        Ok(Self {
            width,
            height,
            values: vec![value.clamp(0.0, 1.0); len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[y as usize * self.width as usize + x as usize])
    }
}

fn byte_len(width: u32, height: u32) -> SphereshadeResult<usize> {
    if width == 0 || height == 0 {
        return Err(SphereshadeError::validation(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| SphereshadeError::validation("image buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/raster.rs"]
mod tests;
