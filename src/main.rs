//! Mirror Maze entry point
//!
//! Loads a level, casts one frame from the player's position and prints it
//! to stdout as text.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use mirror_maze::renderer::AsciiCanvas;
use mirror_maze::{Level, Player, QualityPreset, Settings, render_frame};

#[derive(Debug, Parser)]
#[command(version, about = "Render a mirror maze level as text")]
struct Args {
    /// Level JSON file; the built-in level is used when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,

    /// Settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Screen columns (one ray each)
    #[arg(long)]
    columns: Option<u32>,

    /// Screen rows
    #[arg(long)]
    rows: Option<u32>,

    /// Mirror bounces per column
    #[arg(long)]
    bounces: Option<u32>,

    /// Quality preset: low, medium or high
    #[arg(short, long)]
    quality: Option<String>,

    /// Draw distance in cells
    #[arg(long)]
    depth: Option<f64>,

    /// Colour the output with 24-bit ANSI escapes
    #[arg(long)]
    color: bool,

    /// Override the player's heading, in degrees
    #[arg(long, allow_negative_numbers = true)]
    angle: Option<f64>,

    /// Write the built-in level to this path and exit
    #[arg(long, value_name = "PATH")]
    write_default_level: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.write_default_level {
        let json = Level::builtin().to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote default level to {}", path.display());
        return Ok(());
    }

    let level = match &args.level {
        Some(path) => Level::load(path).with_context(|| format!("loading level {}", path.display()))?,
        None => {
            log::info!("Using built-in level");
            Level::builtin()
        }
    };

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(name) = &args.quality {
        let preset = QualityPreset::from_str(name)
            .with_context(|| format!("unknown quality preset {name:?}"))?;
        settings.apply_preset(preset);
    }
    if let Some(columns) = args.columns {
        settings.column_override = Some(columns);
    }
    if let Some(rows) = args.rows {
        settings.screen_height = rows;
    }
    if let Some(bounces) = args.bounces {
        settings.max_bounces = bounces;
    }
    if let Some(depth) = args.depth {
        settings.max_depth = depth;
    }

    let player = match args.angle {
        Some(degrees) => Player::new(level.player.position, degrees.to_radians()),
        None => level.player,
    };

    let params = settings.frame_params();
    log::info!(
        "Rendering {}x{} ({}), up to {} bounces within {} cells",
        params.screen.width,
        params.screen.height,
        settings.quality.as_str(),
        params.max_bounces,
        params.max_depth
    );

    let frame = render_frame(&level.grid, &player, &params);
    let canvas = AsciiCanvas::from_frame(&frame);
    if args.color {
        print!("{}", canvas.to_ansi());
    } else {
        print!("{canvas}");
    }
    Ok(())
}
