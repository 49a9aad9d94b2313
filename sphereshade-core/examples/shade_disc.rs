//! Renders a flat disc with an in-process `SphereRenderer`, then shades and composites it.
//!
//! ```text
//! cargo run -p sphereshade-core --example shade_disc -- target/examples/disc.png
//! ```

use std::path::PathBuf;

use sphereshade::{
    Canvas, ImageFrame, Raster, Rgb8, ShadeOpts, SnapshotParams, SnapshotRequest,
    SphereRenderer, SphereshadeResult, Vec3, plain_background, save_raster, shade_and_composite,
    take_snapshot,
};

/// Paints the sphere's silhouette with the texture's centre colour.
struct FlatDisc;

impl SphereRenderer for FlatDisc {
    fn snapshot_sphere(&mut self, req: &SnapshotRequest<'_>) -> SphereshadeResult<Vec<u8>> {
        let (w, h) = (f64::from(req.canvas.width), f64::from(req.canvas.height));
        let colour = req
            .source
            .pixel(req.source.width() / 2, req.source.height() / 2)
            .unwrap_or([255, 255, 255, 255]);

        // Frame units to pixels; no perspective.
        let r_px = req.radius * w / (req.frame.right - req.frame.left);

        let mut out = Vec::with_capacity(req.canvas.pixel_count() * 4);
        for y in 0..req.canvas.height {
            for x in 0..req.canvas.width {
                let dx = f64::from(x) + 0.5 - w / 2.0;
                let dy = f64::from(y) + 0.5 - h / 2.0;
                if dx * dx + dy * dy <= r_px * r_px {
                    out.extend_from_slice(&colour);
                } else {
                    out.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }
        Ok(out)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target/examples/shade_disc.png"));

    let texture = Raster::filled(64, 48, [40, 90, 200, 255])?;
    let params = SnapshotParams {
        canvas: Canvas::default(),
        center: Vec3::new(0.0, 0.0, 500.0),
        radius: 200.0,
        density: 1,
        frame: ImageFrame::default(),
        axis: Default::default(),
    };
    let snapshot = take_snapshot(&mut FlatDisc, &texture, &params)?;

    let background = plain_background(params.canvas, Rgb8::new(20, 20, 20))?;
    let shaded = shade_and_composite(&snapshot, &background, &ShadeOpts::default())?;
    save_raster(&out, &shaded)?;

    println!("wrote {}", out.display());
    Ok(())
}
