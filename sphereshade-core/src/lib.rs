//! sphereshade shades rendered sphere snapshots and composites them over a background.
//!
//! A scene runs in two phases:
//!
//! 1. **Acquire**: an external [`SphereRenderer`] maps a (square-cropped) texture onto a sphere
//!    and returns a fixed-size RGBA8 snapshot, which is persisted as-is.
//! 2. **Shade & composite**: a [`vertical_gradient`] sized to the snapshot is added to it with
//!    [`shade`], and the result is alpha-composited over the background with [`composite`],
//!    weighted by the shaded image's own alpha.
//!
//! The building blocks are plain functions over [`Raster`] values, so they can be used without
//! any of the file or renderer plumbing:
//!
//! ```
//! use sphereshade::{Offset, OpacityMask, Raster, Rgb8, composite, shade, vertical_gradient};
//!
//! let snapshot = Raster::filled(4, 4, [0, 0, 0, 255])?;
//! let background = Raster::filled(4, 4, [255, 255, 255, 255])?;
//!
//! let gradient = vertical_gradient(4, 4, Rgb8::WHITE, Rgb8::BLACK)?;
//! let shaded = shade(&snapshot, &gradient, 0.55)?;
//! let mask = OpacityMask::from_alpha(&shaded);
//! let out = composite(&background, &shaded, Offset::ZERO, &mask)?;
//! assert_eq!(out.pixel(0, 0), Some([140, 140, 140, 255]));
//! # Ok::<(), sphereshade::SphereshadeError>(())
//! ```
//!
//! Images are straight (non-premultiplied) RGBA8 throughout. Gradient, shading and compositing
//! process rows in parallel on the current rayon pool.
#![forbid(unsafe_code)]

mod assets;
mod effects;
mod foundation;
mod render;
mod scene;
mod session;

pub use assets::decode::{decode_raster, load_raster};
pub use assets::encode::{ensure_parent_dir, save_raster};
pub use effects::composite::{composite, composite_in_place, over_rgb};
pub use effects::gradient::vertical_gradient;
pub use effects::shade::{DEFAULT_GRADIENT_WEIGHT, ShadeWeights, shade, shade_weighted};
pub use foundation::core::{AxisSelect, Canvas, ImageFrame, Offset, Rgb8, Vec3};
pub use foundation::error::{SphereshadeError, SphereshadeResult};
pub use foundation::raster::{OpacityMask, Raster};
pub use render::command::CommandRenderer;
pub use render::snapshot::{SnapshotParams, SnapshotRequest, SphereRenderer, take_snapshot};
pub use scene::config::{RendererConfig, SceneConfig, SceneFile, SphereConfig};
pub use session::pipeline::{
    SceneOutput, ShadeOpts, acquire_snapshot, plain_background, run_scene, run_scenes,
    shade_and_composite, shade_scene, shade_scenes,
};
