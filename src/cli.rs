use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "wallet-score",
    version,
    about = "Rule-based credit scores for lending-protocol wallets"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score every wallet in a transaction export
    Score(ScoreCommand),
    /// Print the aggregated feature vector of each wallet
    Features(FeaturesCommand),
    /// Show the itemised score breakdown for one wallet
    Explain(ExplainCommand),
    /// Print the effective scoring rules
    Rules(RulesCommand),
}

#[derive(Args)]
pub struct ScoreCommand {
    /// JSON export file, or a directory of JSON shards
    pub input: PathBuf,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct FeaturesCommand {
    pub input: PathBuf,
    /// Only print this wallet
    #[arg(long)]
    pub wallet: Option<String>,
}

#[derive(Args)]
pub struct ExplainCommand {
    pub input: PathBuf,
    #[arg(long)]
    pub wallet: String,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RulesCommand {
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Scores,
    Md,
}
