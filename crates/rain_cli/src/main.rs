mod host;
mod record;
#[cfg(feature = "window")]
mod window;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rain_render::{
    FontRasterizer, GlyphRasterizer, GridGeometry, ImageFile, Mask, MaskSource,
    PatternRasterizer, RainAnimator, RainOptions,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use host::{FixedStepClock, HostApplication};
use record::RecordingDisplay;

#[derive(Parser, Debug)]
#[command(author, version, about = "Glyph rain shaped by the bright parts of an image")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the rain in a window until it is closed
    Run(RunArgs),
    /// Render a fixed number of frames to PNG files
    Record(RecordArgs),
    /// Print the mask derived from an image
    Mask(MaskArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Mask image path
    #[arg(default_value = "vi.png")]
    input: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct RecordArgs {
    /// Mask image path
    input: PathBuf,
    /// Output directory for frame files
    #[arg(short, long)]
    out_dir: PathBuf,
    /// Number of frames to render
    #[arg(long, default_value_t = 90)]
    frames: u64,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Mask image path
    input: PathBuf,
    #[command(flatten)]
    surface: SurfaceSettings,
}

#[derive(Parser, Debug, Clone)]
struct SurfaceSettings {
    /// Surface width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Surface height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Glyph cell size in pixels
    #[arg(long, default_value_t = 12)]
    cell_size: u32,
    /// Channel value R, G and B must all exceed for a cell to show rain
    #[arg(long, default_value_t = rain_render::DEFAULT_THRESHOLD)]
    threshold: u8,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    #[command(flatten)]
    surface: SurfaceSettings,
    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// TTF/OTF font with katakana coverage; block glyphs are drawn without one
    #[arg(long)]
    font: Option<PathBuf>,
    /// Seed for the glyph and timing randomness
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Record(args) => record(args),
        Commands::Mask(args) => mask(args),
    }
}

#[cfg(feature = "window")]
fn run(args: RunArgs) -> Result<()> {
    use host::WallClock;
    use window::WindowDisplay;

    let options = args.settings.surface.to_options();
    let animator = build_animator(&args.input, &args.settings)?;
    let display = WindowDisplay::open("rain", options.width, options.height)?;
    let clock = WallClock::new(args.settings.fps);

    info!("running at {} fps, close the window or press Escape to quit", args.settings.fps);
    HostApplication::new(animator, options.width, options.height, display, clock).run()?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run(args: RunArgs) -> Result<()> {
    anyhow::bail!(
        "cannot show {:?}: this build has no window support, rebuild with `--features window` \
         or use `rain record`",
        args.input
    )
}

fn record(args: RecordArgs) -> Result<()> {
    let options = args.settings.surface.to_options();
    let animator = build_animator(&args.input, &args.settings)?;
    let display = RecordingDisplay::new(args.out_dir, args.frames)?;
    let clock = FixedStepClock::new(args.settings.fps);

    let mut host = HostApplication::new(animator, options.width, options.height, display, clock);
    host.run()?;
    host.into_display().finish();
    Ok(())
}

fn mask(args: MaskArgs) -> Result<()> {
    let options = args.surface.to_options();
    let geometry: GridGeometry = options.geometry()?;
    let image = ImageFile::new(&args.input)
        .load()
        .with_context(|| format!("failed to read mask from {:?}", args.input))?;

    let mask = Mask::from_image(&geometry.fit(&image), options.threshold);
    for row in mask.text_rows() {
        println!("{}", row);
    }
    info!("{} of {} cells show rain", mask.count_on(), geometry.cells());

    Ok(())
}

fn build_animator(input: &Path, settings: &RenderSettings) -> Result<RainAnimator<StdRng>> {
    let options = settings.surface.to_options();
    let rasterizer = settings.rasterizer()?;
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    RainAnimator::new(&options, &ImageFile::new(input), rasterizer.as_ref(), rng)
        .with_context(|| format!("failed to start rain from {:?}", input))
}

impl SurfaceSettings {
    fn to_options(&self) -> RainOptions {
        let mut options = RainOptions::default();
        options.width = self.width;
        options.height = self.height;
        options.cell_size = self.cell_size;
        options.threshold = self.threshold;
        options
    }
}

impl RenderSettings {
    fn rasterizer(&self) -> Result<Box<dyn GlyphRasterizer>> {
        let Some(path) = &self.font else {
            warn!("no --font given, drawing block glyphs");
            return Ok(Box::new(PatternRasterizer));
        };

        let font = FontRasterizer::from_path(path)?;
        if !font.supports('\u{30a2}') {
            warn!("font {:?} has no katakana, glyphs may render empty", path);
        }
        Ok(Box::new(font))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_follow_the_classic_setup() {
        let cli = Cli::try_parse_from(["rain", "run"]).unwrap();
        let Commands::Run(args) = cli.command else { panic!("expected run") };
        assert_eq!(args.input, PathBuf::from("vi.png"));
        assert_eq!(args.settings.fps, 30);

        let options = args.settings.surface.to_options();
        assert_eq!((options.width, options.height, options.cell_size), (800, 480, 12));
        assert_eq!(options.threshold, 128);
    }

    #[test]
    fn record_renders_requested_frames() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("mask.png");
        image::RgbImage::from_pixel(10, 10, image::Rgb([255, 255, 255])).save(&image_path).unwrap();
        let out_dir = dir.path().join("out");

        let cli = Cli::try_parse_from([
            "rain",
            "record",
            image_path.to_str().unwrap(),
            "--out-dir",
            out_dir.to_str().unwrap(),
            "--frames",
            "3",
            "--width",
            "40",
            "--height",
            "24",
            "--cell-size",
            "8",
            "--seed",
            "1",
        ])
        .unwrap();
        let Commands::Record(args) = cli.command else { panic!("expected record") };
        record(args).unwrap();

        let frames = std::fs::read_dir(&out_dir).unwrap().count();
        assert_eq!(frames, 3);
    }

    #[test]
    fn missing_image_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        let settings = RenderSettings {
            surface: SurfaceSettings { width: 40, height: 24, cell_size: 8, threshold: 128 },
            fps: 30,
            font: None,
            seed: Some(0),
        };

        let err = build_animator(&dir.path().join("absent.png"), &settings).err().unwrap();
        assert!(format!("{err:#}").contains("absent.png"));
    }
}
