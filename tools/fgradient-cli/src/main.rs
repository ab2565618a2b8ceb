//! fgradient CLI: place an image on a three-stop gradient and export it.
//!
//! Usage:
//!   fgradient export <IMAGE>    Render and save a PNG to the download directory
//!   fgradient copy <IMAGE>      Render and copy the PNG to the clipboard
//!   fgradient preview [IMAGE]   Print the live preview styling
//!   fgradient prefs show        Show the persisted sizing preferences
//!   fgradient prefs reset       Forget the persisted sizing preferences

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::scene::SceneArgs;

#[derive(Parser)]
#[command(
    name = "fgradient",
    about = "Put an image on a gradient background and export it as PNG",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the scene and save it as gradient-image-<ms>.png
    Export {
        /// Image to place on the gradient (JPG, PNG or WebP)
        image: PathBuf,

        #[command(flatten)]
        scene: SceneArgs,

        /// Directory to save into (defaults to the download directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Device pixel ratio to render at
        #[arg(long)]
        scale: Option<f32>,
    },

    /// Render the scene and copy it to the clipboard
    Copy {
        /// Image to place on the gradient (JPG, PNG or WebP)
        image: PathBuf,

        #[command(flatten)]
        scene: SceneArgs,

        /// Device pixel ratio to render at
        #[arg(long)]
        scale: Option<f32>,
    },

    /// Show how the live preview would style the scene
    Preview {
        /// Optional image to place on the gradient
        image: Option<PathBuf>,

        #[command(flatten)]
        scene: SceneArgs,

        /// Print the style as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect or reset persisted sizing preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the stored sizing record
    Show,
    /// Remove the stored sizing record
    Reset,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = fgradient_common::config::AppConfig::load();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    fgradient_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Export {
            image,
            scene,
            out_dir,
            scale,
        } => commands::export::run(&config, image, scene, out_dir, scale).await,
        Commands::Copy {
            image,
            scene,
            scale,
        } => commands::copy::run(&config, image, scene, scale).await,
        Commands::Preview { image, scene, json } => {
            commands::preview::run(&config, image, scene, json)
        }
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs::show(&config),
            PrefsAction::Reset => commands::prefs::reset(&config),
        },
    }
}
