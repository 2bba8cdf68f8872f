//! Pausecut CLI - Silence Removal for Audio Files
//!
//! Command-line interface for the Pausecut pause editor.

use clap::Parser;
use env_logger::Env;
use log::info;

use pausecut::cli::{commands, Cli, Commands, ProjectsAction};
use pausecut::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Pausecut v{}", env!("CARGO_PKG_VERSION"));

    handle_command(cli.command)
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Detect {
            input,
            min_pause,
            local,
        } => commands::detect(&input, min_pause, local),
        Commands::Split {
            input,
            output,
            min_pause,
            keep,
            local,
            store,
            no_save,
        } => commands::split(
            &input,
            output.as_deref(),
            min_pause,
            &keep,
            local,
            &store,
            no_save,
        ),
        Commands::Waveform {
            input,
            output,
            width,
            height,
            zoom,
            min_pause,
            local,
        } => commands::waveform(&input, &output, width, height, zoom, min_pause, local),
        Commands::Projects { action } => match action {
            ProjectsAction::List { store } => commands::projects_list(&store),
            ProjectsAction::Show { id, store } => commands::projects_show(&id, &store),
            ProjectsAction::Delete { id, store } => commands::projects_delete(&id, &store),
        },
    }
}
