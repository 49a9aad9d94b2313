use std::path::{Path, PathBuf};

use crate::foundation::{
    error::{SphereshadeError, SphereshadeResult},
    raster::Raster,
};

/// Encode `raster` to `path`, picking the format from the file extension.
///
/// The image is written to a sibling temporary file and renamed into place, so an existing file
/// at `path` is only replaced by a complete image. Formats without alpha (JPEG) receive the RGB
/// channels only.
pub fn save_raster(path: impl AsRef<Path>, raster: &Raster) -> SphereshadeResult<()> {
    let path = path.as_ref();
    let format = image::ImageFormat::from_path(path).map_err(|e| {
        SphereshadeError::validation(format!(
            "cannot infer image format for '{}': {e}",
            path.display()
        ))
    })?;
    ensure_parent_dir(path)?;

    let tmp = temp_sibling(path);
    let mut guard = TempFileGuard(Some(tmp.clone()));

    let (width, height) = raster.dimensions();
    let result = if format == image::ImageFormat::Jpeg {
        let rgb: Vec<u8> = raster
            .as_bytes()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        image::save_buffer_with_format(&tmp, &rgb, width, height, image::ColorType::Rgb8, format)
    } else {
        image::save_buffer_with_format(
            &tmp,
            raster.as_bytes(),
            width,
            height,
            image::ColorType::Rgba8,
            format,
        )
    };
    result.map_err(|e| {
        SphereshadeError::io(format!("encode {format:?} '{}': {e}", path.display()))
    })?;

    std::fs::rename(&tmp, path)
        .map_err(|e| SphereshadeError::io(format!("move image into '{}': {e}", path.display())))?;
    guard.0 = None;

    tracing::debug!(path = %path.display(), width, height, "saved image");
    Ok(())
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> SphereshadeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            SphereshadeError::io(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encode.rs"]
mod tests;
