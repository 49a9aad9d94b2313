use std::path::Path;

use crate::foundation::{
    error::{SphereshadeError, SphereshadeResult},
    raster::Raster,
};

/// Decode encoded image bytes (any format `image` recognises) into straight RGBA8.
pub fn decode_raster(bytes: &[u8]) -> SphereshadeResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SphereshadeError::validation(format!("decode image from memory: {e}")))?;
    into_raster(dyn_img)
}

/// Read and decode an image file into straight RGBA8.
///
/// Images without an alpha channel come back fully opaque.
pub fn load_raster(path: impl AsRef<Path>) -> SphereshadeResult<Raster> {
    let path = path.as_ref();
    let reader = image::ImageReader::open(path)
        .map_err(|e| SphereshadeError::io(format!("open image '{}': {e}", path.display())))?
        .with_guessed_format()
        .map_err(|e| SphereshadeError::io(format!("read image '{}': {e}", path.display())))?;
    let dyn_img = reader.decode().map_err(|e| {
        SphereshadeError::validation(format!("decode image '{}': {e}", path.display()))
    })?;
    let raster = into_raster(dyn_img)?;
    tracing::debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "loaded image"
    );
    Ok(raster)
}

fn into_raster(dyn_img: image::DynamicImage) -> SphereshadeResult<Raster> {
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
