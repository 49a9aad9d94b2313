use std::path::PathBuf;

use crate::{
    assets::{decode::load_raster, encode::save_raster},
    effects::{
        composite::composite,
        gradient::vertical_gradient,
        shade::{DEFAULT_GRADIENT_WEIGHT, shade},
    },
    foundation::{
        core::{Canvas, Offset, Rgb8},
        error::{SphereshadeError, SphereshadeResult},
        raster::{OpacityMask, Raster},
    },
    render::snapshot::{SphereRenderer, take_snapshot},
    scene::config::{SceneConfig, SceneFile},
};

/// Options for the shade-and-composite phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadeOpts {
    pub gradient_start: Rgb8,
    pub gradient_end: Rgb8,
    pub gradient_weight: f32,
    /// Where the shaded snapshot's top-left corner lands on the background.
    pub offset: Offset,
}

impl Default for ShadeOpts {
    fn default() -> Self {
        Self {
            gradient_start: Rgb8::WHITE,
            gradient_end: Rgb8::BLACK,
            gradient_weight: DEFAULT_GRADIENT_WEIGHT,
            offset: Offset::ZERO,
        }
    }
}

impl ShadeOpts {
    pub fn validate(&self) -> SphereshadeResult<()> {
        if !self.gradient_weight.is_finite() {
            return Err(SphereshadeError::validation(
                "gradient weight must be finite",
            ));
        }
        Ok(())
    }
}

/// Paths written for one scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneOutput {
    pub name: String,
    pub snapshot: Option<PathBuf>,
    pub shaded: PathBuf,
}

/// Shade `snapshot` with a vertical gradient and alpha-composite it over a copy of `background`.
///
/// The gradient is sized to the snapshot. The opacity mask is the shaded image's alpha.
#[tracing::instrument(skip(snapshot, background))]
pub fn shade_and_composite(
    snapshot: &Raster,
    background: &Raster,
    opts: &ShadeOpts,
) -> SphereshadeResult<Raster> {
    opts.validate()?;
    let (w, h) = snapshot.dimensions();
    let gradient = vertical_gradient(w, h, opts.gradient_start, opts.gradient_end)?;
    let shaded = shade(snapshot, &gradient, opts.gradient_weight)?;
    let mask = OpacityMask::from_alpha(&shaded);
    composite(background, &shaded, opts.offset, &mask)
}

/// Plain single-colour background used when a scene names no background image.
pub fn plain_background(canvas: Canvas, color: Rgb8) -> SphereshadeResult<Raster> {
    canvas.validate()?;
    Raster::filled(canvas.width, canvas.height, color.to_rgba8())
}

/// Phase 1: render the scene's sphere and persist the raw snapshot to `snapshot_out`.
#[tracing::instrument(skip_all, fields(scene = %scene.name))]
pub fn acquire_snapshot<R: SphereRenderer + ?Sized>(
    renderer: &mut R,
    scene: &SceneConfig,
) -> SphereshadeResult<Raster> {
    let params = scene.snapshot_params()?;
    let Some(sphere) = scene.sphere.as_ref() else {
        return Err(SphereshadeError::validation("scene has no sphere section"));
    };

    let texture = load_raster(&sphere.texture)?;
    tracing::info!(texture = %sphere.texture.display(), "acquiring snapshot");
    let snapshot = take_snapshot(renderer, &texture, &params)?;

    save_raster(&scene.snapshot_out, &snapshot)?;
    tracing::info!(out = %scene.snapshot_out.display(), "wrote raw snapshot");
    Ok(snapshot)
}

/// Phase 2 from disk: load `snapshot_out` and the background, shade, composite and persist
/// the result to `shaded_out`.
#[tracing::instrument(skip_all, fields(scene = %scene.name))]
pub fn shade_scene(scene: &SceneConfig) -> SphereshadeResult<Raster> {
    let snapshot = load_raster(&scene.snapshot_out)?;
    shade_loaded(scene, &snapshot)
}

/// Run both phases for one scene. The freshly rendered snapshot is shaded from memory.
#[tracing::instrument(skip_all, fields(scene = %scene.name))]
pub fn run_scene<R: SphereRenderer + ?Sized>(
    renderer: &mut R,
    scene: &SceneConfig,
) -> SphereshadeResult<SceneOutput> {
    let snapshot = acquire_snapshot(renderer, scene)?;
    shade_loaded(scene, &snapshot)?;
    Ok(SceneOutput {
        name: scene.name.clone(),
        snapshot: Some(scene.snapshot_out.clone()),
        shaded: scene.shaded_out.clone(),
    })
}

/// Run every scene of `file` in order, stopping at the first failure.
pub fn run_scenes<R: SphereRenderer + Send + ?Sized>(
    renderer: &mut R,
    file: &SceneFile,
) -> SphereshadeResult<Vec<SceneOutput>> {
    file.validate()?;
    let run = |renderer: &mut R| {
        file.scenes
            .iter()
            .map(|scene| run_scene(renderer, scene))
            .collect::<SphereshadeResult<Vec<_>>>()
    };

    match file.threads {
        Some(n) => {
            let pool = build_thread_pool(Some(n))?;
            pool.install(|| run(renderer))
        }
        None => run(renderer),
    }
}

/// Shade every scene from its existing snapshot file, without rendering.
pub fn shade_scenes(file: &SceneFile) -> SphereshadeResult<Vec<SceneOutput>> {
    file.validate()?;
    let run = || {
        file.scenes
            .iter()
            .map(|scene| {
                shade_scene(scene)?;
                Ok(SceneOutput {
                    name: scene.name.clone(),
                    snapshot: None,
                    shaded: scene.shaded_out.clone(),
                })
            })
            .collect::<SphereshadeResult<Vec<_>>>()
    };

    match file.threads {
        Some(n) => build_thread_pool(Some(n))?.install(run),
        None => run(),
    }
}

fn shade_loaded(scene: &SceneConfig, snapshot: &Raster) -> SphereshadeResult<Raster> {
    let background = match &scene.background {
        Some(path) => load_raster(path)?,
        None => plain_background(scene.canvas, scene.background_color)?,
    };
    tracing::info!(
        snapshot_w = snapshot.width(),
        snapshot_h = snapshot.height(),
        background_w = background.width(),
        background_h = background.height(),
        "shading snapshot"
    );

    let out = shade_and_composite(snapshot, &background, &scene.shade_opts())?;
    save_raster(&scene.shaded_out, &out)?;
    tracing::info!(out = %scene.shaded_out.display(), "wrote shaded image");
    Ok(out)
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> SphereshadeResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SphereshadeError::validation(
            "'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        SphereshadeError::validation(format!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/pipeline.rs"]
mod tests;
