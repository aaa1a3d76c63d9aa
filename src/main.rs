use std::path::PathBuf;

use chicane::errors::ChicaneError;
use chicane::geometry::DEFAULT_TRACK_WIDTH;
use chicane::replay::{ReplaySession, format_race_clock, loader};
use chicane::ui::ReplayApp;
use chicane::ui::config::AppConfig;
use clap::{Parser, Subcommand};
use egui::Vec2;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the replay window for a recorded session
    Play {
        /// JSONL file with one replay frame per line
        #[arg(short, long)]
        frames: PathBuf,

        /// JSON file with the reference lap's x/y centerline samples
        #[arg(short, long)]
        lap: PathBuf,

        /// Optional JSON map of driver id to [r, g, b] marker color
        #[arg(short, long)]
        colors: Option<PathBuf>,

        /// Full track width in world units; each boundary is drawn half this
        /// distance from the reference lap centerline
        #[arg(short = 'w', long, default_value_t = DEFAULT_TRACK_WIDTH)]
        track_width: f32,

        /// Initial playback speed
        #[arg(short, long)]
        speed: Option<f32>,
    },
    /// Print a summary of a recorded session without opening a window
    Info {
        #[arg(short, long)]
        frames: PathBuf,
    },
}

fn play(
    frames_path: &PathBuf,
    lap_path: &PathBuf,
    colors_path: Option<&PathBuf>,
    track_width: f32,
    speed: Option<f32>,
) -> Result<(), ChicaneError> {
    let frames = loader::load_frames(frames_path)?;
    let reference_lap = loader::load_reference_lap(lap_path)?;
    let colors = match colors_path {
        Some(path) => loader::load_driver_colors(path)?,
        None => Default::default(),
    };

    let session = ReplaySession::new(frames, &reference_lap, track_width, colors)?;

    let mut app_config = AppConfig::from_local_file().unwrap_or_default();
    if let Some(speed) = speed {
        app_config.default_playback_speed = speed;
    }

    let window_position = app_config.window_position.clone();

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_inner_size(Vec2::new(app_config.window_width, app_config.window_height))
        .with_position(window_position)
        .with_resizable(true);

    eframe::run_native(
        "Chicane Replay",
        native_options,
        Box::new(move |cc| Ok(Box::new(ReplayApp::new(session, app_config, cc)))),
    )
    .expect("could not start app");
    Ok(())
}

fn info(frames_path: &PathBuf) -> Result<(), ChicaneError> {
    let frames = loader::load_frames(frames_path)?;
    let first = frames.first().map(|f| f.t).unwrap_or(0.0);
    let last = frames.last().map(|f| f.t).unwrap_or(0.0);
    let drivers: Vec<&String> = frames
        .iter()
        .flat_map(|f| f.drivers.keys())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    println!("Frames:   {}", frames.len());
    println!(
        "Duration: {} ({} -> {})",
        format_race_clock(last - first),
        format_race_clock(first),
        format_race_clock(last)
    );
    println!("Drivers:  {}", drivers.len());
    for driver in drivers {
        println!("  {}", driver);
    }
    Ok(())
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let cli = Args::parse();
    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");
    match &cli.command {
        Commands::Play {
            frames,
            lap,
            colors,
            track_width,
            speed,
        } => {
            play(frames, lap, colors.as_ref(), *track_width, *speed)
                .expect("Error while playing replay");
        }
        Commands::Info { frames } => {
            info(frames).expect("Error while reading replay file");
        }
    };
}
