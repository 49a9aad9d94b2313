use crate::foundation::{
    core::{AxisSelect, Canvas, ImageFrame, Vec3},
    error::{SphereshadeError, SphereshadeResult},
    raster::Raster,
};

/// Inputs for one sphere snapshot, apart from the source texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapshotParams {
    /// Output dimensions of the snapshot.
    pub canvas: Canvas,
    pub center: Vec3,
    pub radius: f64,
    /// Samples per pixel.
    pub density: u32,
    pub frame: ImageFrame,
    pub axis: AxisSelect,
}

impl SnapshotParams {
    pub fn validate(&self) -> SphereshadeResult<()> {
        self.canvas.validate()?;
        if !self.center.is_finite() {
            return Err(SphereshadeError::validation("sphere center must be finite"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SphereshadeError::validation(format!(
                "sphere radius must be > 0, got {}",
                self.radius
            )));
        }
        if self.density == 0 {
            return Err(SphereshadeError::validation("sampling density must be > 0"));
        }
        self.frame.validate()
    }
}

/// Everything a [`SphereRenderer`] receives for one call.
#[derive(Clone, Copy, Debug)]
pub struct SnapshotRequest<'a> {
    pub canvas: Canvas,
    /// Square-cropped source texture.
    pub source: &'a Raster,
    pub center: Vec3,
    pub radius: f64,
    pub density: u32,
    pub frame: ImageFrame,
    pub axis: AxisSelect,
}

/// External engine that renders a textured sphere into a fixed-size RGBA8 canvas.
///
/// Implementations return `canvas.width * canvas.height` tightly packed straight RGBA8 pixels.
pub trait SphereRenderer {
    fn snapshot_sphere(&mut self, req: &SnapshotRequest<'_>) -> SphereshadeResult<Vec<u8>>;
}

impl<R: SphereRenderer + ?Sized> SphereRenderer for Box<R> {
    fn snapshot_sphere(&mut self, req: &SnapshotRequest<'_>) -> SphereshadeResult<Vec<u8>> {
        (**self).snapshot_sphere(req)
    }
}

/// Render the raw, unshaded snapshot of `texture` mapped onto a sphere.
///
/// The texture is cropped to its centred square before it is handed over. The renderer's output
/// is checked against the canvas size.
#[tracing::instrument(skip(renderer, texture), fields(texture_w = texture.width(), texture_h = texture.height()))]
pub fn take_snapshot<R: SphereRenderer + ?Sized>(
    renderer: &mut R,
    texture: &Raster,
    params: &SnapshotParams,
) -> SphereshadeResult<Raster> {
    params.validate()?;
    let source = texture.crop_square();

    let req = SnapshotRequest {
        canvas: params.canvas,
        source: &source,
        center: params.center,
        radius: params.radius,
        density: params.density,
        frame: params.frame,
        axis: params.axis,
    };
    let pixels = renderer.snapshot_sphere(&req)?;

    let expected = params.canvas.pixel_count();
    if pixels.len() % 4 != 0 || pixels.len() / 4 != expected {
        return Err(SphereshadeError::collaborator(format!(
            "renderer returned {} bytes, expected {expected} rgba8 pixels ({}x{})",
            pixels.len(),
            params.canvas.width,
            params.canvas.height
        )));
    }

    tracing::debug!(
        width = params.canvas.width,
        height = params.canvas.height,
        "snapshot received"
    );
    Raster::from_rgba8(params.canvas.width, params.canvas.height, pixels)
}

#[cfg(test)]
#[path = "../../tests/unit/render/snapshot.rs"]
mod tests;
