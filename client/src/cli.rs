use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "Shapes Self Learning Client")]
#[clap(about = "Trains and plays grid games with configurable winning shapes", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Train(TrainCommand),
    Play(PlayCommand),
}

#[derive(Args)]
pub struct TrainCommand {
    #[clap(short, long, default_value_t = String::from("client.conf"))]
    pub config: String,
}

#[derive(Args)]
#[clap(about = "Play against the engine in the terminal. The engine moves first.", long_about = None)]
pub struct PlayCommand {
    #[clap(short, long, default_value_t = String::from("client.conf"))]
    pub config: String,

    /// Run self learning before the first game.
    #[clap(short, long)]
    pub train: bool,
}
