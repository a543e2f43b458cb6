// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use kameraku::app::AppModel;
use kameraku::backends::camera::types::Facing;
use kameraku::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "kameraku")]
#[command(about = "Simple camera for taking photos and recording videos")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List,

    /// Take a photo
    Photo {
        /// Camera to use: back or front
        #[arg(short, long, default_value = "back")]
        camera: Facing,

        /// Output file path (default: ~/Pictures/KameraKu/IMG_TIMESTAMP.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Record a video
    Video {
        /// Camera to use: back or front
        #[arg(short, long, default_value = "back")]
        camera: Facing,

        /// Recording duration in seconds
        #[arg(short, long, default_value = "10")]
        duration: u64,

        /// Output file path (default: ~/Videos/KameraKu/VID_TIMESTAMP.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control the log level
    // Examples: RUST_LOG=debug, RUST_LOG=kameraku=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo { camera, output }) => cli::take_photo(camera, output),
        Some(Commands::Video {
            camera,
            duration,
            output,
        }) => cli::record_video(camera, duration, output),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(480.0),
    );

    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
