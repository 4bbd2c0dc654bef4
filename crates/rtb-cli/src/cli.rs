use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rtb",
    about = "Reaction-time leaderboard: serve the board, inspect it, and record results",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the leaderboard and reserved-code files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Print the leaderboard
    List(ListArgs),
    /// Reserve a fresh code
    Reserve,
    /// Record a result
    Submit(SubmitArgs),
    /// Show the rank a result would get right now
    Rank(RankArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    #[arg(long)]
    pub bind: Option<String>,
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct SubmitArgs {
    /// Reaction time in milliseconds
    pub reaction_time: f64,
    #[arg(short, long)]
    pub info: Option<String>,
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args)]
pub struct RankArgs {
    pub reaction_time: f64,
}
