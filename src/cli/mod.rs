//! CLI Module
//!
//! Command-line interface for the Pausecut audio editor.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pausecut - silence detection and removal for audio files
#[derive(Parser, Debug)]
#[command(name = "pausecut")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect pauses in an audio file and print them as JSON
    Detect {
        /// Input audio file
        input: PathBuf,

        /// Minimum pause duration in seconds (0.1 - 3.0)
        #[arg(long, default_value_t = 0.5)]
        min_pause: f64,

        /// Use the offline energy detector instead of the bridge
        #[arg(long)]
        local: bool,
    },

    /// Detect pauses, splice them out and write a WAV file
    Split {
        /// Input audio file
        input: PathBuf,

        /// Output path (default: <input>_no_pauses.wav next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum pause duration in seconds (0.1 - 3.0)
        #[arg(long, default_value_t = 0.5)]
        min_pause: f64,

        /// 1-based indexes of detected pauses to keep (comma separated)
        #[arg(long, value_delimiter = ',')]
        keep: Vec<usize>,

        /// Use the offline energy detector instead of the bridge
        #[arg(long)]
        local: bool,

        /// Project store directory
        #[arg(long, default_value = "projects")]
        store: PathBuf,

        /// Do not save a project record
        #[arg(long)]
        no_save: bool,
    },

    /// Render the waveform with removal bands to a PNG
    Waveform {
        /// Input audio file
        input: PathBuf,

        /// Output PNG path
        #[arg(short, long, default_value = "waveform.png")]
        output: PathBuf,

        /// Drawing width in pixels before zoom
        #[arg(long, default_value_t = 1024)]
        width: u32,

        /// Drawing height in pixels
        #[arg(long, default_value_t = 256)]
        height: u32,

        /// Zoom factor (1.0 - 20.0)
        #[arg(long, default_value_t = 1.0)]
        zoom: f32,

        /// Minimum pause duration in seconds (0.1 - 3.0)
        #[arg(long, default_value_t = 0.5)]
        min_pause: f64,

        /// Use the offline energy detector instead of the bridge
        #[arg(long)]
        local: bool,
    },

    /// Manage saved project records
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsAction {
    /// List saved projects
    List {
        /// Project store directory
        #[arg(long, default_value = "projects")]
        store: PathBuf,
    },

    /// Print one project record as JSON
    Show {
        /// Project id
        id: String,

        /// Project store directory
        #[arg(long, default_value = "projects")]
        store: PathBuf,
    },

    /// Delete a project record
    Delete {
        /// Project id
        id: String,

        /// Project store directory
        #[arg(long, default_value = "projects")]
        store: PathBuf,
    },
}
