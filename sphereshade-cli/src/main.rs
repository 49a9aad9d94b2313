use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sphereshade::{
    CommandRenderer, DEFAULT_GRADIENT_WEIGHT, Offset, Rgb8, SceneFile, ShadeOpts,
};

#[derive(Parser, Debug)]
#[command(name = "sphereshade", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a vertical gradient image.
    Gradient(GradientArgs),
    /// Shade a snapshot image and composite it over a background.
    Shade(ShadeArgs),
    /// Render the raw snapshot of every scene in a scene file.
    Snapshot(SceneArgs),
    /// Render, shade and composite every scene in a scene file.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct GradientArgs {
    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Colour of the top row (#rrggbb or r,g,b).
    #[arg(long, default_value = "#ffffff")]
    from: Rgb8,

    /// Colour the gradient runs towards.
    #[arg(long, default_value = "#000000")]
    to: Rgb8,

    /// Output image path; format follows the extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ShadeArgs {
    /// Raw snapshot image (RGBA).
    #[arg(long)]
    snapshot: PathBuf,

    /// Background image. Defaults to a plain canvas the size of the snapshot.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Colour of the plain background.
    #[arg(long, default_value = "#000000")]
    background_color: Rgb8,

    #[arg(long, default_value = "#ffffff")]
    from: Rgb8,

    #[arg(long, default_value = "#000000")]
    to: Rgb8,

    /// Shading strength of the gradient.
    #[arg(long, default_value_t = DEFAULT_GRADIENT_WEIGHT)]
    weight: f32,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_x: i64,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset_y: i64,

    /// Output image path; format follows the extension.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Scene file (JSON).
    #[arg(long)]
    scenes: PathBuf,

    /// Only process the scene with this name.
    #[arg(long)]
    scene: Option<String>,

    /// Renderer program, overriding the scene file's `renderer`.
    #[arg(long)]
    renderer: Option<PathBuf>,

    /// Extra argument passed to the renderer (repeatable).
    #[arg(long = "renderer-arg", allow_hyphen_values = true)]
    renderer_args: Vec<String>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Shade existing snapshots instead of rendering new ones.
    #[arg(long, default_value_t = false)]
    skip_render: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Gradient(args) => cmd_gradient(args),
        Command::Shade(args) => cmd_shade(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_gradient(args: GradientArgs) -> anyhow::Result<()> {
    let img = sphereshade::vertical_gradient(args.width, args.height, args.from, args.to)?;
    sphereshade::save_raster(&args.out, &img)
        .with_context(|| format!("write gradient '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_shade(args: ShadeArgs) -> anyhow::Result<()> {
    let snapshot = sphereshade::load_raster(&args.snapshot)?;
    let background = match &args.background {
        Some(path) => sphereshade::load_raster(path)?,
        None => sphereshade::plain_background(
            sphereshade::Canvas {
                width: snapshot.width(),
                height: snapshot.height(),
            },
            args.background_color,
        )?,
    };

    let opts = ShadeOpts {
        gradient_start: args.from,
        gradient_end: args.to,
        gradient_weight: args.weight,
        offset: Offset::new(args.offset_x, args.offset_y),
    };
    let out = sphereshade::shade_and_composite(&snapshot, &background, &opts)?;
    sphereshade::save_raster(&args.out, &out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_snapshot(args: SceneArgs) -> anyhow::Result<()> {
    let file = load_scene_file(&args)?;
    let mut renderer = renderer_for(&args, &file)?;
    for scene in &file.scenes {
        sphereshade::acquire_snapshot(&mut renderer, scene)
            .with_context(|| format!("scene '{}': acquire snapshot", scene.name))?;
        eprintln!("wrote {}", scene.snapshot_out.display());
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let file = load_scene_file(&args.scene)?;
    let outputs = if args.skip_render {
        sphereshade::shade_scenes(&file)?
    } else {
        let mut renderer = renderer_for(&args.scene, &file)?;
        sphereshade::run_scenes(&mut renderer, &file)?
    };

    for out in outputs {
        eprintln!("[{}] wrote {}", out.name, out.shaded.display());
    }
    Ok(())
}

fn load_scene_file(args: &SceneArgs) -> anyhow::Result<SceneFile> {
    let mut file = SceneFile::from_path(&args.scenes)
        .with_context(|| format!("load scene file '{}'", args.scenes.display()))?;
    if let Some(name) = &args.scene {
        file.scenes.retain(|s| &s.name == name);
        if file.scenes.is_empty() {
            anyhow::bail!("no scene named '{name}' in '{}'", args.scenes.display());
        }
    }
    Ok(file)
}

fn renderer_for(args: &SceneArgs, file: &SceneFile) -> anyhow::Result<CommandRenderer> {
    if let Some(program) = &args.renderer {
        return Ok(CommandRenderer::new(program).with_args(args.renderer_args.iter().cloned()));
    }
    let Some(cfg) = &file.renderer else {
        anyhow::bail!("no renderer configured: pass --renderer or set 'renderer' in the scene file");
    };
    Ok(cfg
        .to_renderer()
        .with_args(args.renderer_args.iter().cloned()))
}
