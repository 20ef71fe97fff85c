use clap::{Parser, Subcommand};
use kemetdata::PlayerCount;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Root of the map asset tree (containing `data/` and `img/`)
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    /// Player count to start with
    #[arg(long, default_value = "3")]
    pub players: PlayerCount,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Interactive picker on stdin (default behavior).
    ///
    /// Commands: `players N`, `click X Y [W H]`, `wait`, `status`, `log`, `help`, `quit`.
    Session,

    /// Resolve one click and print the region info.
    Pick {
        /// Click position in displayed-image coordinates.
        x: f64,
        y: f64,
        /// Displayed map width (default: native hitbox width).
        #[arg(long)]
        width: Option<f64>,
        /// Displayed map height (default: native hitbox height).
        #[arg(long)]
        height: Option<f64>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Resolve one click and save the highlighted map as an image.
    Render {
        x: f64,
        y: f64,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
        /// Output path for the image.
        #[arg(short, long, default_value = "selection.png")]
        output: PathBuf,
    },

    /// Check map data against its hitbox image.
    Validate,

    /// List player counts with installed map data.
    Counts,
}
