//! riverspiral-render: animation driver for the river spiral visualization.
//!
//! Loads a river table, owns the animation state, and computes one frame
//! per step increment, writing each frame out as SVG (and optionally PNG
//! and JSON). A fixed pointer position can be supplied to render hover
//! labels.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin riverspiral-render -- [OPTIONS] --out-dir <DIR> [CSV_PATH]
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use riverspiral_export::{SceneOptions, SvgMetadata};
use riverspiral_io::{CsvOptions, LoadError};
use riverspiral_pipeline::{
    AnimationState, ContinentGroups, Dimensions, Frame, HoverIndex, LayoutConfig, MarkerHit,
    OutlineCache, Point, SpiralLayoutEngine, hit_test,
};
use tracing_subscriber::EnvFilter;

/// Render river spiral animation frames from a CSV table.
///
/// Each frame reveals `--step-increment` more spiral units than the one
/// before. Without `--frames`, rendering stops at the first frame in which
/// every spiral is complete.
#[derive(Parser)]
#[command(name = "riverspiral-render", version)]
struct Cli {
    /// Path to the input table (header row with name, continent, length).
    #[arg(default_value = "assets/rivers.csv")]
    csv_path: PathBuf,

    /// Directory to write frames into (created if missing).
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames to render.
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<u64>::new().range(1..))]
    frames: Option<u64>,

    /// Spiral units revealed per frame.
    #[arg(
        long,
        default_value_t = AnimationState::DEFAULT_STEP_INCREMENT,
        value_parser = clap::builder::RangedU64ValueParser::<u64>::new().range(1..)
    )]
    step_increment: u64,

    /// Pointer position in canvas coordinates as "X,Y".
    #[arg(long, value_name = "X,Y")]
    pointer: Option<String>,

    /// Hit-test through an R-tree instead of scanning every marker.
    #[arg(long)]
    indexed_hover: bool,

    /// Also write a PNG raster of each frame.
    #[arg(long)]
    png: bool,

    /// Also write each frame's geometry as JSON.
    #[arg(long)]
    json: bool,

    /// Credit line drawn in the bottom-left corner.
    #[arg(long)]
    credit: Option<String>,

    /// Field delimiter of the input table.
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Angle added per spiral step, in radians.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_ANGLE_INCREMENT)]
    angle_increment: f64,

    /// Radius added per spiral step.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_RADIUS_INCREMENT)]
    radius_increment: f64,

    /// Kilometres per spiral unit.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_LENGTH_SCALE)]
    length_scale: f64,

    /// Horizontal position of the first spiral.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_LEFT_MARGIN)]
    left_margin: f64,

    /// Horizontal distance between spirals.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_CONTINENT_SPACING)]
    continent_spacing: f64,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_CANVAS_WIDTH)]
    canvas_width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_CANVAS_HEIGHT)]
    canvas_height: u32,

    /// Pointer distance below which a marker counts as hovered.
    #[arg(long, default_value_t = LayoutConfig::DEFAULT_HOVER_RADIUS)]
    hover_radius: f64,

    /// Full layout config as a JSON string.
    ///
    /// When provided, all other layout parameter flags are ignored.
    /// The JSON must be a valid `LayoutConfig` serialization; missing
    /// fields take their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Errors that stop the driver.
#[derive(Debug, thiserror::Error)]
enum RenderError {
    #[error("invalid --config-json: {0}")]
    ConfigJson(#[source] serde_json::Error),

    #[error("failed to serialize layout config: {0}")]
    ConfigSerialize(#[source] serde_json::Error),

    #[error("pointer must be 'X,Y', got {0:?}")]
    Pointer(String),

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(char),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize frame {step}: {source}")]
    FrameJson {
        step: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Export(#[from] riverspiral_export::ExportError),
}

/// Build a [`LayoutConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<LayoutConfig, RenderError> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(RenderError::ConfigJson);
    }

    Ok(LayoutConfig {
        angle_increment: cli.angle_increment,
        radius_increment: cli.radius_increment,
        length_scale: cli.length_scale,
        left_margin: cli.left_margin,
        continent_spacing: cli.continent_spacing,
        canvas: Dimensions {
            width: cli.canvas_width,
            height: cli.canvas_height,
        },
        hover_radius: cli.hover_radius,
    })
}

/// Serialize `config` for the SVG metadata block.
fn layout_json(config: &LayoutConfig) -> Result<String, RenderError> {
    serde_json::to_string(config).map_err(RenderError::ConfigSerialize)
}

/// Parse `--pointer "X,Y"`.
fn parse_pointer(s: &str) -> Result<Point, RenderError> {
    let (x_str, y_str) = s
        .split_once(',')
        .ok_or_else(|| RenderError::Pointer(s.to_string()))?;
    let x: f64 = x_str
        .trim()
        .parse()
        .map_err(|_| RenderError::Pointer(s.to_string()))?;
    let y: f64 = y_str
        .trim()
        .parse()
        .map_err(|_| RenderError::Pointer(s.to_string()))?;
    Ok(Point::new(x, y))
}

fn csv_options(delimiter: char) -> Result<CsvOptions, RenderError> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .map(|delimiter| CsvOptions { delimiter })
        .ok_or(RenderError::Delimiter(delimiter))
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), RenderError> {
    std::fs::write(path, contents).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Markers under `pointer` in `frame`, if a pointer was given.
fn hovered<'a>(
    frame: &'a Frame,
    pointer: Option<Point>,
    radius: f64,
    indexed: bool,
) -> Vec<MarkerHit<'a>> {
    match pointer {
        None => Vec::new(),
        Some(p) if indexed => HoverIndex::new(frame).hits(p, radius),
        Some(p) => hit_test(frame, p, radius),
    }
}

/// Everything one run needs besides the frame itself.
struct Output<'a> {
    dir: &'a Path,
    scene: SceneOptions,
    metadata: SvgMetadata<'a>,
    png: bool,
    json: bool,
}

impl Output<'_> {
    fn write_frame(
        &self,
        index: u64,
        frame: &Frame,
        hits: &[MarkerHit<'_>],
    ) -> Result<(), RenderError> {
        let stem = format!("frame-{index:04}");

        let svg = riverspiral_export::to_svg(frame, &self.scene, hits, &self.metadata);
        write_file(&self.dir.join(format!("{stem}.svg")), &svg)?;

        if self.png {
            let png = riverspiral_export::to_png(frame, &self.scene)?;
            write_file(&self.dir.join(format!("{stem}.png")), &png)?;
        }

        if self.json {
            let json = serde_json::to_string_pretty(frame).map_err(|source| {
                RenderError::FrameJson {
                    step: frame.step,
                    source,
                }
            })?;
            write_file(&self.dir.join(format!("{stem}.json")), &json)?;
        }

        tracing::debug!(
            frame = index,
            step = frame.step,
            hovered = hits.len(),
            "wrote frame"
        );
        Ok(())
    }
}

/// Drive the animation: compute, write, then advance.
///
/// Without a frame limit the loop ends at the first complete frame, or after
/// one frame if the state never moves.
fn animate(
    groups: &ContinentGroups,
    engine: &SpiralLayoutEngine,
    mut state: AnimationState,
    cli: &Cli,
    pointer: Option<Point>,
    output: &Output<'_>,
) -> Result<u64, RenderError> {
    let mut cache = OutlineCache::new();
    let radius = engine.config().hover_radius;
    let mut written = 0;

    loop {
        let frame = engine.compute_frame_cached(groups, &state, &mut cache);
        let hits = hovered(&frame, pointer, radius, cli.indexed_hover);
        output.write_frame(written, &frame, &hits)?;
        written += 1;

        let done = match cli.frames {
            Some(limit) => written >= limit,
            None => state.is_complete(groups) || state.step_increment() == 0,
        };
        if done {
            return Ok(written);
        }
        state.advance();
    }
}

fn run(cli: &Cli) -> Result<(), RenderError> {
    let config = config_from_cli(cli)?;
    let pointer = cli.pointer.as_deref().map(parse_pointer).transpose()?;
    let options = csv_options(cli.delimiter)?;

    let groups = riverspiral_io::load_groups(&cli.csv_path, &options, &config)?;
    tracing::info!(
        continents = groups.len(),
        longest = groups.max_total_length(),
        "loaded river table"
    );

    std::fs::create_dir_all(&cli.out_dir).map_err(|source| RenderError::Write {
        path: cli.out_dir.clone(),
        source,
    })?;

    let title = cli
        .csv_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("rivers");
    let config_json = layout_json(&config)?;
    let output = Output {
        dir: &cli.out_dir,
        scene: SceneOptions {
            credit: cli.credit.clone(),
            ..SceneOptions::default()
        },
        metadata: SvgMetadata {
            title: Some(title),
            description: None,
            config_json: Some(&config_json),
        },
        png: cli.png,
        json: cli.json,
    };

    let engine = SpiralLayoutEngine::new(config);
    let written = animate(
        &groups,
        &engine,
        AnimationState::new(cli.step_increment),
        cli,
        pointer,
        &output,
    )?;

    tracing::info!(
        frames = written,
        out_dir = %cli.out_dir.display(),
        "rendering finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
