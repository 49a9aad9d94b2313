use rayon::prelude::*;

use crate::foundation::{
    error::{SphereshadeError, SphereshadeResult},
    raster::Raster,
};

/// Default shading strength applied to the gradient.
pub const DEFAULT_GRADIENT_WEIGHT: f32 = 0.55;

/// Weights of the per-channel sum `source * source_w + gradient * gradient_w + bias`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeWeights {
    pub source: f32,
    pub gradient: f32,
    pub bias: f32,
}

impl Default for ShadeWeights {
    fn default() -> Self {
        Self::with_gradient(DEFAULT_GRADIENT_WEIGHT)
    }
}

impl ShadeWeights {
    /// Full source retention, no bias.
    pub fn with_gradient(gradient: f32) -> Self {
        Self {
            source: 1.0,
            gradient,
            bias: 0.0,
        }
    }

    pub fn validate(&self) -> SphereshadeResult<()> {
        if !(self.source.is_finite() && self.gradient.is_finite() && self.bias.is_finite()) {
            return Err(SphereshadeError::validation("shade weights must be finite"));
        }
        Ok(())
    }
}

/// Shade `source` with `gradient`: `clamp(round(source + gradient * gradient_weight))` per RGB
/// channel, with exact halves rounded to even. The source alpha passes through unchanged.
pub fn shade(source: &Raster, gradient: &Raster, gradient_weight: f32) -> SphereshadeResult<Raster> {
    shade_weighted(source, gradient, ShadeWeights::with_gradient(gradient_weight))
}

/// Weighted per-channel sum of two equally sized images, saturated to `[0, 255]`.
///
/// Only RGB is blended; alpha is copied from `source` and the gradient's alpha is ignored.
pub fn shade_weighted(
    source: &Raster,
    gradient: &Raster,
    weights: ShadeWeights,
) -> SphereshadeResult<Raster> {
    weights.validate()?;
    if source.dimensions() != gradient.dimensions() {
        return Err(SphereshadeError::validation(format!(
            "shade expects equally sized images, got source {}x{} and gradient {}x{}",
            source.width(),
            source.height(),
            gradient.width(),
            gradient.height()
        )));
    }

    let mut out = source.clone();
    out.bytes_mut()
        .par_chunks_exact_mut(4)
        .zip(gradient.as_bytes().par_chunks_exact(4))
        .for_each(|(d, g)| {
            for c in 0..3 {
                d[c] = weighted_sum(d[c], g[c], weights);
            }
        });
    Ok(out)
}

fn weighted_sum(s: u8, g: u8, w: ShadeWeights) -> u8 {
    let v = f32::from(s) * w.source + f32::from(g) * w.gradient + w.bias;
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shade.rs"]
mod tests;
