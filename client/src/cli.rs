use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "Ultimate Tic-Tac-Toe Match Client")]
#[clap(about = "Plays matches between search agents", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Play(PlayCommand),
}

#[derive(Args)]
#[clap(about = "Plays a series of games between the two configured seats.", long_about = None)]
pub struct PlayCommand {
    #[clap(short, long, default_value_t = String::from("client.conf"))]
    pub config: String,
}
