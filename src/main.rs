use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use pose_snake::game::GameConfig;
use pose_snake::modes::{EnrollConfig, EnrollMode, HumanMode, PoseMode};

#[derive(Parser)]
#[command(name = "pose_snake")]
#[command(version, about = "Snake steered by a webcam-style pose classifier")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play snake with keyboard controls
    Human(GameArgs),

    /// Play snake steered by the position classifier
    Pose(PoseArgs),

    /// Build a classifier snapshot from directories of labeled frames
    Enroll(EnrollArgs),
}

#[derive(Args)]
struct GameArgs {
    /// Canvas width in pixels
    #[arg(long, default_value = "640")]
    canvas_width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "480")]
    canvas_height: u32,

    /// Cell size in pixels
    #[arg(long, default_value = "20")]
    resolution: u32,

    /// Game ticks per second
    #[arg(long, default_value = "5")]
    tick_hz: u32,

    /// Initial snake length
    #[arg(long, default_value = "1")]
    snake_length: usize,
}

#[derive(Args)]
struct PoseArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Path to the pretrained classifier snapshot
    #[arg(long, default_value = "model/knn.json")]
    model: PathBuf,

    /// Directory of frames standing in for the capture device
    #[arg(long)]
    frames: PathBuf,
}

#[derive(Args)]
struct EnrollArgs {
    /// Root directory of labeled frames; each subdirectory is one label
    #[arg(long)]
    frames: PathBuf,

    /// Where to write the snapshot
    #[arg(long, default_value = "model/knn.json")]
    model: PathBuf,

    /// Neighbors consulted per classification
    #[arg(long, default_value = "3")]
    k: usize,
}

impl GameArgs {
    fn into_config(self) -> Result<GameConfig> {
        let config = GameConfig {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            resolution: self.resolution,
            initial_snake_length: self.snake_length,
            tick_hz: self.tick_hz,
        };
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Human(args) => {
            let mut mode = HumanMode::new(args.into_config()?);
            mode.run().await?;
        }
        Command::Pose(args) => {
            let config = args.game.into_config()?;
            let mut mode = PoseMode::new(config, &args.model, &args.frames)?;
            mode.run().await?;
        }
        Command::Enroll(args) => {
            let mode = EnrollMode::new(EnrollConfig {
                frames_root: args.frames,
                model_path: args.model,
                k: args.k,
            });
            mode.run()?;
        }
    }

    Ok(())
}
