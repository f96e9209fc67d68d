#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the facility narrative.

mod config;
mod report;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facility_narrative_core::Progress;
use facility_narrative_driver::{Autoplay, FrameDriver, WheelScroll};
use facility_narrative_rendering::{Presentation, RenderingBackend, WindowSize};
use facility_narrative_rendering_macroquad::MacroquadBackend;
use facility_narrative_system_camera::ManualOverride;
use facility_narrative_world::standard_tanks;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::NarrativeConfig,
    report::{timeline_table, InspectReport},
};

#[derive(Parser, Debug)]
#[command(name = "facility-narrative")]
#[command(about = "Scroll through a wastewater reactor leak and its repair")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the window and scroll through the story (default)
    Run(RunArgs),
    /// Print the channel set and scene summary at one progress value as JSON
    Inspect {
        /// Progress in 0.0..=1.0
        #[arg(long)]
        progress: f32,
        /// Evaluate as if the user holds the camera
        #[arg(long)]
        manual: bool,
    },
    /// Tabulate declarative beats against the render-loop channels
    Timeline {
        /// Number of evenly spaced intervals
        #[arg(long, default_value_t = 20)]
        steps: u32,
    },
}

#[derive(clap::Args, Debug, Default)]
struct RunArgs {
    /// Progress the session opens at, overriding the file
    #[arg(long)]
    start: Option<f32>,

    /// Play the story unattended over this many seconds
    #[arg(long, value_name = "SECONDS")]
    autoplay: Option<f32>,

    /// Restart autoplay from the top when it reaches the end
    #[arg(long, requires = "autoplay")]
    looping: bool,

    /// Show the frame-rate overlay
    #[arg(long)]
    show_fps: bool,

    /// Disable vertical sync
    #[arg(long)]
    no_vsync: bool,

    /// Layer the running-water effect over the leak
    #[arg(long)]
    flow: bool,
}

/// Entry point for the facility narrative command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => NarrativeConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => NarrativeConfig::default(),
    };

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run(config, args),
        Command::Inspect { progress, manual } => inspect(&config, progress, manual),
        Command::Timeline { steps } => {
            print!("{}", timeline_table(steps));
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}

/// Progress supplier chosen for an interactive session.
enum Scroller {
    Wheel(WheelScroll),
    Autoplay(Autoplay),
}

fn run(mut config: NarrativeConfig, args: RunArgs) -> Result<()> {
    if let Some(start) = args.start {
        config.scroll.start = start;
    }
    config.rendering.show_fps |= args.show_fps;
    config.rendering.flow_animation |= args.flow;
    if args.no_vsync {
        config.window.vsync = false;
    }

    let manual = ManualOverride::new();
    let (mut driver, scene) = FrameDriver::setup(
        standard_tanks(),
        manual.clone(),
        config.rendering.driver_options(),
    )
    .context("failed to assemble the facility")?;

    let mut scroller = match args.autoplay {
        Some(seconds) => {
            let duration = Duration::try_from_secs_f32(seconds)
                .context("autoplay duration must be a non-negative number of seconds")?;
            let autoplay = Autoplay::new(duration);
            Scroller::Autoplay(if args.looping {
                autoplay.looping()
            } else {
                autoplay
            })
        }
        None => Scroller::Wheel(config.scroll.wheel()),
    };

    let window_size = WindowSize::new(config.window.width, config.window.height)
        .context("invalid window size")?;
    let presentation = Presentation::new(config.window.title.clone(), window_size, scene);
    let backend = MacroquadBackend::new()
        .with_vsync(config.window.vsync)
        .with_show_fps(config.rendering.show_fps);

    tracing::info!(
        start = config.scroll.start,
        autoplay = ?args.autoplay,
        "opening narrative window"
    );
    backend.run(presentation, move |dt, input, scene| {
        if input.toggle_override {
            let engaged = manual.toggle();
            tracing::info!(engaged, "camera override toggled");
        }
        let _ = match &mut scroller {
            Scroller::Wheel(wheel) => {
                wheel.scroll(input.scroll_delta);
                wheel.step(input.step);
                driver.frame(wheel, dt, scene)
            }
            Scroller::Autoplay(autoplay) => driver.frame(autoplay, dt, scene),
        };
    })
}

fn inspect(config: &NarrativeConfig, progress: f32, manual: bool) -> Result<()> {
    let override_flag = ManualOverride::new();
    if manual {
        override_flag.engage();
    }
    let (mut driver, mut scene) = FrameDriver::setup(
        standard_tanks(),
        override_flag,
        config.rendering.driver_options(),
    )
    .context("failed to assemble the facility")?;

    let channels = driver.advance(Progress::new(progress), Duration::ZERO, &mut scene);
    let json = InspectReport::new(channels, &scene)
        .to_json()
        .context("failed to serialise the inspection report")?;
    println!("{json}");
    Ok(())
}
