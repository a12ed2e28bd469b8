//! `speech-bubble` command-line tool.
//!
//! Renders a single bubble, a bubble per subtitle cue, or full-HD overlay
//! frames from previously rendered bubbles.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bubble_engine::{NineSliceSpec, RasterOps, Size, TextStyle};
use speech_bubble_lib::config::validation::{
    parse_color, require_directory, require_file, validate_blur, validate_outline_percentage,
    validate_point_size, validate_slices,
};
use speech_bubble_lib::{
    AppConfig, Backend, BatchPipeline, BatchReport, BubbleSettings, ConfigError, IconOverlay,
    OverlayPipeline,
};

#[derive(Parser, Debug)]
#[command(name = "speech-bubble", version, about = "Render outlined captions inside nine-slice speech bubbles")]
struct Cli {
    /// Raster backend (overrides SPEECH_BUBBLE_BACKEND).
    #[arg(long, value_enum, global = true)]
    backend: Option<BackendChoice>,

    /// Extra font directory, searched first. May be repeated.
    #[arg(long = "font-dir", global = true)]
    font_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one caption into a bubble image.
    Bubble(BubbleArgs),
    /// Render one bubble per subtitle cue as 000.png, 001.png, ...
    Srt(SrtArgs),
    /// Place an icon and each bubble frame on a transparent 1920x1080 canvas.
    Fhd(FhdArgs),
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Font name or path to a font file.
    font_name: String,
    /// Point size.
    font_size: u32,
    font_color: String,
    /// Outline width as a fraction of the font size (1.0 = 100%).
    outline_percentage: f32,
    outline_color: String,
    /// Nine-slice template image.
    nine_slice_image: PathBuf,
    /// Left cut line (x).
    left: u32,
    /// Top cut line (y).
    top: u32,
    /// Right cut line (x).
    right: u32,
    /// Bottom cut line (y).
    bottom: u32,
}

#[derive(Args, Debug)]
struct Extras {
    /// Gaussian blur applied to the outline.
    #[arg(short, long)]
    blur: Option<f32>,

    /// Flat recolor applied to the nine-slice background.
    #[arg(short, long)]
    color: Option<String>,
}

#[derive(Args, Debug)]
struct BubbleArgs {
    text: String,
    #[command(flatten)]
    style: StyleArgs,
    output_image: PathBuf,
    #[command(flatten)]
    extras: Extras,
}

#[derive(Args, Debug)]
struct SrtArgs {
    /// Subtitle file (.srt, or .vtt for WebVTT).
    srt_file: PathBuf,
    #[command(flatten)]
    style: StyleArgs,
    output_dir: PathBuf,
    #[command(flatten)]
    extras: Extras,
}

#[derive(Args, Debug)]
struct FhdArgs {
    icon_file: PathBuf,
    icon_x: i64,
    icon_y: i64,
    /// Directory of bubble images, searched recursively for .png files.
    speech_bubble_dir: PathBuf,
    speech_bubble_x: i64,
    speech_bubble_y: i64,
    output_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Native,
    Magick,
}

impl From<BackendChoice> for Backend {
    fn from(choice: BackendChoice) -> Self {
        match choice {
            BackendChoice::Native => Backend::Native,
            BackendChoice::Magick => Backend::Magick,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    speech_bubble_lib::load_dotenv();

    match run(cli) {
        Ok(code) => Ok(code),
        Err(e) => {
            if let Some(config_error) = e.downcast_ref::<ConfigError>() {
                eprintln!("{config_error}");
                return Ok(ExitCode::from(1));
            }
            Err(e)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::load()?.with_overrides(cli.backend.map(Backend::from), cli.font_dirs);
    tracing::info!(backend = ?config.backend, "Starting speech-bubble");
    let raster = config.build_raster();

    let report = match cli.cmd {
        Command::Bubble(args) => return cmd_bubble(raster.as_ref(), config.backend, args),
        Command::Srt(args) => cmd_srt(raster.as_ref(), config.backend, args)?,
        Command::Fhd(args) => cmd_fhd(raster.as_ref(), args)?,
    };
    Ok(exit_code(&report))
}

fn cmd_bubble(
    raster: &dyn RasterOps,
    backend: Backend,
    args: BubbleArgs,
) -> anyhow::Result<ExitCode> {
    if let Some(parent) = args.output_image.parent().filter(|p| !p.as_os_str().is_empty()) {
        require_directory(parent)?;
    }
    let settings = bubble_settings(raster, backend, &args.style, &args.extras)?;

    BatchPipeline::new(raster)
        .render_one(&args.text, &settings, &args.output_image)
        .with_context(|| format!("render bubble '{}'", args.output_image.display()))?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_srt(raster: &dyn RasterOps, backend: Backend, args: SrtArgs) -> anyhow::Result<BatchReport> {
    require_directory(&args.output_dir)?;
    require_file(&args.srt_file)?;
    let settings = bubble_settings(raster, backend, &args.style, &args.extras)?;

    let captions = caption_source::load_captions(&args.srt_file)
        .with_context(|| format!("read captions from '{}'", args.srt_file.display()))?;
    let report = BatchPipeline::new(raster)
        .run_captions(&captions, &settings, &args.output_dir)
        .context("caption batch")?;
    Ok(report)
}

fn cmd_fhd(raster: &dyn RasterOps, args: FhdArgs) -> anyhow::Result<BatchReport> {
    require_directory(&args.speech_bubble_dir)?;
    require_directory(&args.output_dir)?;
    require_file(&args.icon_file)?;

    let overlay = IconOverlay {
        icon: args.icon_file,
        icon_offset: (args.icon_x, args.icon_y),
        frame_offset: (args.speech_bubble_x, args.speech_bubble_y),
    };
    let report = OverlayPipeline::new(raster)
        .run(&overlay, &args.speech_bubble_dir, &args.output_dir)
        .context("overlay batch")?;
    Ok(report)
}

/// Validate style arguments and resolve them into batch settings.
fn bubble_settings(
    raster: &dyn RasterOps,
    backend: Backend,
    style: &StyleArgs,
    extras: &Extras,
) -> Result<BubbleSettings, ConfigError> {
    validate_point_size(style.font_size).map_err(|r| ConfigError::invalid("font_size", r))?;
    validate_outline_percentage(style.outline_percentage)
        .map_err(|r| ConfigError::invalid("outline_percentage", r))?;
    let blur = extras.blur.unwrap_or(0.0);
    validate_blur(blur).map_err(|r| ConfigError::invalid("blur", r))?;

    let fill = parse_color("font_color", &style.font_color, backend)?;
    let outline = parse_color("outline_color", &style.outline_color, backend)?;
    let recolor = extras
        .color
        .as_deref()
        .map(|c| parse_color("color", c, backend))
        .transpose()?;

    require_file(&style.nine_slice_image)?;
    let slices = NineSliceSpec::new(style.left, style.top, style.right, style.bottom);
    let template_size = template_size(raster, &style.nine_slice_image)?;
    validate_slices(&slices, template_size)?;

    Ok(BubbleSettings {
        style: TextStyle {
            font: style.font_name.clone(),
            point_size: style.font_size,
            fill,
            outline,
            outline_percentage: style.outline_percentage,
            blur,
        },
        template: style.nine_slice_image.clone(),
        slices,
        recolor,
    })
}

fn template_size(raster: &dyn RasterOps, path: &Path) -> Result<Size, ConfigError> {
    raster
        .image_size(path)
        .map_err(|e| ConfigError::invalid("nine_slice_image", e.to_string()))
}

fn exit_code(report: &BatchReport) -> ExitCode {
    if report.is_success() {
        tracing::info!(written = report.written.len(), "All jobs finished");
        ExitCode::SUCCESS
    } else {
        tracing::error!(
            failed = report.failures.len(),
            total = report.total(),
            "Some jobs failed"
        );
        ExitCode::from(1)
    }
}
