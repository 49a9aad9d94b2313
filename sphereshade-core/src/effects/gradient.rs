use rayon::prelude::*;

use crate::foundation::{
    core::Rgb8,
    error::{SphereshadeError, SphereshadeResult},
    raster::Raster,
};

/// Build a `width x height` image whose colour runs linearly from `start` (row 0) towards `end`.
///
/// Row `i` gets `start + i * ((end - start) / height)` per channel, truncated to an integer.
/// The step divides by `height`, not `height - 1`, so the last row stops one step short of
/// `end`. Callers that need an inclusive ramp must account for this.
///
/// Every pixel in a row is identical and fully opaque.
pub fn vertical_gradient(
    width: u32,
    height: u32,
    start: Rgb8,
    end: Rgb8,
) -> SphereshadeResult<Raster> {
    if width == 0 || height == 0 {
        return Err(SphereshadeError::validation(format!(
            "gradient dimensions must be non-zero, got {width}x{height}"
        )));
    }

    let mut out = Raster::filled(width, height, [0, 0, 0, 255])?;
    let stride = out.stride();
    let start = start.channels();
    let end = end.channels();
    let rows = f64::from(height);
    let step: [f64; 3] =
        std::array::from_fn(|c| (f64::from(end[c]) - f64::from(start[c])) / rows);

    out.bytes_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(i, row)| {
            let px = row_color(start, step, i as f64);
            for dst in row.chunks_exact_mut(4) {
                dst[..3].copy_from_slice(&px);
            }
        });

    tracing::trace!(width, height, "vertical gradient generated");
    Ok(out)
}

fn row_color(start: [u8; 3], step: [f64; 3], i: f64) -> [u8; 3] {
    std::array::from_fn(|c| (f64::from(start[c]) + i * step[c]).clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/gradient.rs"]
mod tests;
