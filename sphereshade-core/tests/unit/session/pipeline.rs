use std::path::Path;

use super::*;
use crate::{render::snapshot::SnapshotRequest, scene::config::SphereConfig};

/// Draws an opaque grey disc on a transparent canvas; counts its calls.
struct DiscRenderer {
    calls: usize,
}

impl SphereRenderer for DiscRenderer {
    fn snapshot_sphere(&mut self, req: &SnapshotRequest<'_>) -> SphereshadeResult<Vec<u8>> {
        self.calls += 1;
        let (w, h) = (req.canvas.width as i64, req.canvas.height as i64);
        let r = w.min(h) / 2;
        let mut out = Vec::with_capacity(req.canvas.pixel_count() * 4);
        for y in 0..h {
            for x in 0..w {
                let (dx, dy) = (x - w / 2, y - h / 2);
                if dx * dx + dy * dy < r * r {
                    out.extend_from_slice(&[100, 100, 100, 255]);
                } else {
                    out.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }
        Ok(out)
    }
}

fn scene_in(dir: &Path, name: &str) -> SceneConfig {
    let texture = dir.join("texture.png");
    save_raster(&texture, &Raster::filled(6, 4, [50, 60, 70, 255]).unwrap()).unwrap();
    SceneConfig {
        name: name.to_string(),
        sphere: Some(SphereConfig {
            center: [0.0, 0.0, 500.0].into(),
            radius: 200.0,
            density: 4,
            texture,
            axis_select: false,
        }),
        canvas: Canvas {
            width: 16,
            height: 16,
        },
        snapshot_out: dir.join(format!("{name}-raw.png")),
        shaded_out: dir.join(format!("{name}-shaded.png")),
        ..SceneConfig::default()
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_pipeline").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn transparent_snapshot_leaves_background_untouched() {
    let snapshot = Raster::filled(4, 4, [255, 0, 0, 0]).unwrap();
    let background = Raster::filled(4, 4, [10, 20, 30, 255]).unwrap();
    let out = shade_and_composite(&snapshot, &background, &ShadeOpts::default()).unwrap();
    assert_eq!(out, background);
}

#[test]
fn opaque_snapshot_is_shaded_top_light_bottom_dark() {
    let snapshot = Raster::filled(2, 4, [0, 0, 0, 255]).unwrap();
    let background = Raster::filled(2, 4, [9, 9, 9, 255]).unwrap();
    let out = shade_and_composite(&snapshot, &background, &ShadeOpts::default()).unwrap();
    // Gradient rows 255, 191, 127, 63 scaled by 0.55 and rounded.
    let expected = [140u8, 105, 70, 35];
    for (y, v) in expected.into_iter().enumerate() {
        assert_eq!(out.pixel(1, y as u32), Some([v, v, v, 255]));
    }
}

#[test]
fn smaller_snapshot_lands_at_offset() {
    let snapshot = Raster::filled(1, 1, [0, 0, 0, 255]).unwrap();
    let background = Raster::filled(3, 3, [0, 0, 0, 255]).unwrap();
    let opts = ShadeOpts {
        offset: Offset::new(2, 1),
        gradient_weight: 1.0,
        ..ShadeOpts::default()
    };
    let out = shade_and_composite(&snapshot, &background, &opts).unwrap();
    assert_eq!(out.pixel(2, 1), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(1, 1), Some([0, 0, 0, 255]));
}

#[test]
fn non_finite_weight_is_rejected() {
    let img = Raster::filled(1, 1, [0; 4]).unwrap();
    let opts = ShadeOpts {
        gradient_weight: f32::NAN,
        ..ShadeOpts::default()
    };
    assert!(shade_and_composite(&img, &img, &opts).is_err());
}

#[test]
fn plain_background_fills_canvas() {
    let bg = plain_background(
        Canvas {
            width: 3,
            height: 2,
        },
        Rgb8::new(1, 2, 3),
    )
    .unwrap();
    assert_eq!(bg, Raster::filled(3, 2, [1, 2, 3, 255]).unwrap());
}

#[test]
fn run_scene_writes_snapshot_and_shaded_output() {
    let dir = scratch_dir("run_scene");
    let scene = scene_in(&dir, "one");
    let mut renderer = DiscRenderer { calls: 0 };

    let out = run_scene(&mut renderer, &scene).unwrap();
    assert_eq!(renderer.calls, 1);
    assert_eq!(out.snapshot.as_deref(), Some(scene.snapshot_out.as_path()));

    let raw = load_raster(&scene.snapshot_out).unwrap();
    assert_eq!(raw.dimensions(), (16, 16));
    assert_eq!(raw.pixel(0, 0), Some([0, 0, 0, 0]));

    let shaded = load_raster(&scene.shaded_out).unwrap();
    // Corner: outside the disc, plain black background.
    assert_eq!(shaded.pixel(0, 0), Some([0, 0, 0, 255]));
    // Centre row 8: 100 + round(0.55 * (255 - 8 * 255 / 16)).
    assert_eq!(shaded.pixel(8, 8), Some([170, 170, 170, 255]));
}

#[test]
fn shade_scene_reads_existing_snapshot() {
    let dir = scratch_dir("shade_scene");
    let mut scene = scene_in(&dir, "two");
    scene.sphere = None;
    save_raster(
        &scene.snapshot_out,
        &Raster::filled(16, 16, [0, 0, 0, 0]).unwrap(),
    )
    .unwrap();
    let bg_path = dir.join("bg.png");
    save_raster(&bg_path, &Raster::filled(16, 16, [1, 2, 3, 255]).unwrap()).unwrap();
    scene.background = Some(bg_path);

    let out = shade_scene(&scene).unwrap();
    assert_eq!(out, Raster::filled(16, 16, [1, 2, 3, 255]).unwrap());
    assert!(scene.shaded_out.exists());
}

#[test]
fn run_scenes_stops_at_first_failure() {
    let dir = scratch_dir("run_scenes");
    let good = scene_in(&dir, "good");
    let mut bad = scene_in(&dir, "bad");
    bad.sphere.as_mut().unwrap().texture = dir.join("missing.png");
    let after = scene_in(&dir, "after");

    let file = SceneFile {
        threads: Some(2),
        renderer: None,
        scenes: vec![good.clone(), bad, after.clone()],
    };
    let mut renderer = DiscRenderer { calls: 0 };
    let err = run_scenes(&mut renderer, &file).unwrap_err();

    assert!(matches!(err, SphereshadeError::Io(_)));
    assert!(good.shaded_out.exists());
    assert!(!after.snapshot_out.exists());
    assert_eq!(renderer.calls, 1);
}

#[test]
fn run_scene_without_sphere_is_a_validation_error() {
    let dir = scratch_dir("no_sphere");
    let mut scene = scene_in(&dir, "none");
    scene.sphere = None;
    let mut renderer = DiscRenderer { calls: 0 };
    let err = run_scene(&mut renderer, &scene).unwrap_err();
    assert!(matches!(err, SphereshadeError::Validation(_)));
    assert_eq!(renderer.calls, 0);
}

#[test]
fn thread_pool_rejects_zero_threads() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
    assert!(build_thread_pool(None).is_ok());
}
