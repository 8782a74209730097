mod cli;
mod game;
mod options;
mod player;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use common::{ConfigLoader, FsExt};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use ultimate_tictactoe::Engine;

use game::play_match;
use options::{PlayOptions, SeatOptions};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Play(play_args) => {
            let config_path = play_args.config.relative_to_cwd()?;
            let config = ConfigLoader::new(&config_path, "play".to_string())?;
            let play_options: PlayOptions = config.load()?;

            let seats: [SeatOptions; 2] = [
                ConfigLoader::new(&config_path, "player_1".to_string())?.load()?,
                ConfigLoader::new(&config_path, "player_2".to_string())?.load()?,
            ];

            info!("Playing {:?} with seats {:?}", play_options, seats);

            let engine = Engine::new();
            let summary = play_match(&engine, &play_options, &seats)?;

            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("Failed to serialize match summary")?
            );
        }
    }

    Ok(())
}
