use rayon::prelude::*;

use crate::foundation::{
    core::Offset,
    error::{SphereshadeError, SphereshadeResult},
    raster::{OpacityMask, Raster},
};

/// Alpha-over of one straight-RGBA pixel onto another, RGB only.
///
/// `src * opacity + dst * (1 - opacity)`, truncated. The destination alpha is kept.
pub fn over_rgb(dst: [u8; 4], src: [u8; 4], opacity: f64) -> [u8; 4] {
    let m = opacity.clamp(0.0, 1.0);
    if m <= 0.0 {
        return dst;
    }

    let mut out = dst;
    for c in 0..3 {
        let d = f64::from(dst[c]);
        let s = f64::from(src[c]);
        out[c] = (s * m + d * (1.0 - m)).clamp(0.0, 255.0) as u8;
    }
    out
}

/// Composite `foreground` over a copy of `background` with its top-left corner at `offset`.
///
/// Each foreground pixel is weighted by the matching `mask` value. Pixels that land outside the
/// background are dropped. The background's alpha channel is not modified.
pub fn composite(
    background: &Raster,
    foreground: &Raster,
    offset: Offset,
    mask: &OpacityMask,
) -> SphereshadeResult<Raster> {
    let mut out = background.clone();
    composite_in_place(&mut out, foreground, offset, mask)?;
    Ok(out)
}

/// In-place form of [`composite`] for callers that own the background exclusively.
pub fn composite_in_place(
    background: &mut Raster,
    foreground: &Raster,
    offset: Offset,
    mask: &OpacityMask,
) -> SphereshadeResult<()> {
    if mask.dimensions() != foreground.dimensions() {
        return Err(SphereshadeError::validation(format!(
            "opacity mask is {}x{} but foreground is {}x{}",
            mask.width(),
            mask.height(),
            foreground.width(),
            foreground.height()
        )));
    }

    let Some(ov) = Overlap::compute(background.dimensions(), foreground.dimensions(), offset)
    else {
        tracing::debug!(?offset, "foreground entirely outside background; nothing to blend");
        return Ok(());
    };

    let bg_stride = background.stride();
    let fg_w = foreground.width() as usize;
    let fg_bytes = foreground.as_bytes();
    let mask_values = mask.values();

    background
        .bytes_mut()
        .par_chunks_exact_mut(bg_stride)
        .enumerate()
        .skip(ov.bg_y)
        .take(ov.height)
        .for_each(|(by, bg_row)| {
            let fy = by - ov.bg_y + ov.fg_y;
            let fg_row_start = fy * fg_w;
            for i in 0..ov.width {
                let fx = ov.fg_x + i;
                let bi = (ov.bg_x + i) * 4;
                let fi = (fg_row_start + fx) * 4;

                let dst = [bg_row[bi], bg_row[bi + 1], bg_row[bi + 2], bg_row[bi + 3]];
                let src = [
                    fg_bytes[fi],
                    fg_bytes[fi + 1],
                    fg_bytes[fi + 2],
                    fg_bytes[fi + 3],
                ];
                let out = over_rgb(dst, src, mask_values[fg_row_start + fx]);
                bg_row[bi..bi + 4].copy_from_slice(&out);
            }
        });
    Ok(())
}

/// Intersection of a placed foreground with the background, in both coordinate spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Overlap {
    bg_x: usize,
    bg_y: usize,
    fg_x: usize,
    fg_y: usize,
    width: usize,
    height: usize,
}

impl Overlap {
    fn compute(bg: (u32, u32), fg: (u32, u32), offset: Offset) -> Option<Self> {
        // i128 keeps `offset + extent` exact for any i64 offset.
        let span = |bg_len: u32, fg_len: u32, off: i64| -> Option<(usize, usize, usize)> {
            let off = i128::from(off);
            let start = off.max(0);
            let end = (off + i128::from(fg_len)).min(i128::from(bg_len));
            if end <= start {
                return None;
            }
            Some((
                start as usize,
                (start - off) as usize,
                (end - start) as usize,
            ))
        };

        let (bg_x, fg_x, width) = span(bg.0, fg.0, offset.x)?;
        let (bg_y, fg_y, height) = span(bg.1, fg.1, offset.y)?;
        Some(Self {
            bg_x,
            bg_y,
            fg_x,
            fg_y,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
