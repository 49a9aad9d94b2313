use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    effects::shade::DEFAULT_GRADIENT_WEIGHT,
    foundation::{
        core::{AxisSelect, Canvas, ImageFrame, Offset, Rgb8, Vec3},
        error::{SphereshadeError, SphereshadeResult},
    },
    render::{command::CommandRenderer, snapshot::SnapshotParams},
    session::pipeline::ShadeOpts,
};

/// A JSON scene file: shared settings plus the scenes to run in order.
///
/// ```json
/// {
///   "renderer": { "program": "./render-sphere", "args": ["--quiet"] },
///   "scenes": [
///     {
///       "name": "north",
///       "sphere": { "center": [0, 500, 0], "radius": 200, "density": 50,
///                   "texture": "Images/checker.png", "axis_select": true },
///       "background": "Images/plainblack.png"
///     }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    /// Dedicated rayon pool size for the run. `None` uses the global pool.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub renderer: Option<RendererConfig>,
    pub scenes: Vec<SceneConfig>,
}

impl SceneFile {
    /// Parse a scene file from a JSON reader. Paths are left as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> SphereshadeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SphereshadeError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene file from disk, resolving relative paths against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> SphereshadeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SphereshadeError::io(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        let mut file = Self::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        file.resolve_paths(base);
        file.validate()?;
        Ok(file)
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        if let Some(renderer) = &mut self.renderer {
            renderer.resolve_paths(base);
        }
        for scene in &mut self.scenes {
            scene.resolve_paths(base);
        }
    }

    pub fn validate(&self) -> SphereshadeResult<()> {
        if self.scenes.is_empty() {
            return Err(SphereshadeError::validation("scene file has no scenes"));
        }
        if self.threads == Some(0) {
            return Err(SphereshadeError::validation("'threads' must be >= 1 when set"));
        }
        for scene in &self.scenes {
            scene.validate()?;
        }
        Ok(())
    }
}

/// External renderer program and its leading arguments.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

impl RendererConfig {
    /// Bare program names (`julia`) are looked up on `PATH`; relative paths with a directory
    /// component (`bin/render`) are taken relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.program.is_relative() && self.program.components().count() > 1 {
            self.program = base.join(&self.program);
        }
    }

    pub fn to_renderer(&self) -> CommandRenderer {
        CommandRenderer::new(&self.program).with_args(self.args.iter().cloned())
    }
}

/// Sphere placement and texture for the acquire phase.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereConfig {
    pub center: Vec3,
    pub radius: f64,
    /// Samples per pixel.
    pub density: u32,
    pub texture: PathBuf,
    #[serde(default)]
    pub axis_select: bool,
}

/// One scene: acquire a snapshot, shade it, composite it over a background.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SceneConfig {
    pub name: String,
    /// Required to acquire a snapshot; shade-only runs may omit it.
    pub sphere: Option<SphereConfig>,
    pub canvas: Canvas,
    pub frame: ImageFrame,
    /// Background image. `None` uses a plain `background_color` canvas.
    pub background: Option<PathBuf>,
    pub background_color: Rgb8,
    pub gradient_start: Rgb8,
    pub gradient_end: Rgb8,
    pub gradient_weight: f32,
    pub offset: Offset,
    pub snapshot_out: PathBuf,
    pub shaded_out: PathBuf,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: "scene".to_string(),
            sphere: None,
            canvas: Canvas::default(),
            frame: ImageFrame::default(),
            background: None,
            background_color: Rgb8::BLACK,
            gradient_start: Rgb8::WHITE,
            gradient_end: Rgb8::BLACK,
            gradient_weight: DEFAULT_GRADIENT_WEIGHT,
            offset: Offset::ZERO,
            snapshot_out: PathBuf::from("output.png"),
            shaded_out: PathBuf::from("shaded_output.jpg"),
        }
    }
}

impl SceneConfig {
    pub fn resolve_paths(&mut self, base: &Path) {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        if let Some(sphere) = &mut self.sphere {
            join(&mut sphere.texture);
        }
        if let Some(bg) = &mut self.background {
            join(bg);
        }
        join(&mut self.snapshot_out);
        join(&mut self.shaded_out);
    }

    pub fn validate(&self) -> SphereshadeResult<()> {
        let ctx = |e: SphereshadeError| match e {
            SphereshadeError::Validation(msg) => {
                SphereshadeError::validation(format!("scene '{}': {msg}", self.name))
            }
            other => other,
        };
        self.canvas.validate().map_err(ctx)?;
        self.frame.validate().map_err(ctx)?;
        if self.sphere.is_some() {
            self.snapshot_params().map_err(ctx)?;
        }
        self.shade_opts().validate().map_err(ctx)
    }

    /// Renderer inputs for this scene; fails if the scene has no `sphere` section.
    pub fn snapshot_params(&self) -> SphereshadeResult<SnapshotParams> {
        let sphere = self.sphere.as_ref().ok_or_else(|| {
            SphereshadeError::validation(format!(
                "scene '{}' has no 'sphere' section to render",
                self.name
            ))
        })?;
        let params = SnapshotParams {
            canvas: self.canvas,
            center: sphere.center,
            radius: sphere.radius,
            density: sphere.density,
            frame: self.frame,
            axis: AxisSelect::from_flag(sphere.axis_select),
        };
        params.validate()?;
        Ok(params)
    }

    pub fn shade_opts(&self) -> ShadeOpts {
        ShadeOpts {
            gradient_start: self.gradient_start,
            gradient_end: self.gradient_end,
            gradient_weight: self.gradient_weight,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
