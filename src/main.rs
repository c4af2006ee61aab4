mod cli;

use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use wallet_score::error::ScoreError;
use wallet_score::{config, ingest, pipeline, report};

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 2;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: cli::Cli) -> Result<i32, ScoreError> {
    let cwd = std::env::current_dir()?;
    match cli.command {
        cli::Commands::Score(cmd) => {
            let rules = config::load_rules(&cwd, cmd.config.as_deref())?;
            let input = ingest::read_input(&cmd.input)?;
            let score_report = pipeline::run(&input, &rules);

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Scores => report::OutputFormat::Scores,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            let rendered = report::render(&score_report, output_format)?;
            emit(&rendered, cmd.output.as_deref())?;

            if let Some(path) = &cmd.output {
                eprintln!(
                    "wrote {} wallet scores to {}",
                    score_report.scores.len(),
                    path.display()
                );
            }

            if score_report.has_warnings() {
                eprintln!(
                    "warning: {} malformed records skipped, {} wallets excluded",
                    score_report.summary.records_rejected, score_report.summary.wallets_excluded
                );
                Ok(exit_code::WARNINGS)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Features(cmd) => {
            let input = ingest::read_input(&cmd.input)?;
            let mut features = pipeline::features_for(&input);
            if let Some(wallet) = &cmd.wallet {
                features.retain(|address, _| address == wallet);
                if features.is_empty() {
                    return Err(ScoreError::WalletNotFound(wallet.clone()));
                }
            }
            println!("{}", report::json::features_to_json(&features)?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Explain(cmd) => {
            let rules = config::load_rules(&cwd, cmd.config.as_deref())?;
            let input = ingest::read_input(&cmd.input)?;
            let mut features = pipeline::features_for(&input);
            features.retain(|address, _| *address == cmd.wallet);
            let scored = pipeline::score_wallets(&features, &rules);

            if let Some(score) = scored.scores.get(&cmd.wallet) {
                println!("{}", report::md::explain(&cmd.wallet, score));
                Ok(exit_code::SUCCESS)
            } else if let Some(reason) = scored.excluded.get(&cmd.wallet) {
                println!("{}: excluded ({reason})", cmd.wallet);
                Ok(exit_code::WARNINGS)
            } else {
                Err(ScoreError::WalletNotFound(cmd.wallet))
            }
        }
        cli::Commands::Rules(cmd) => {
            let rules = config::load_rules(&cwd, cmd.config.as_deref())?;
            print!("{}", config::render_rules(&rules)?);
            Ok(exit_code::SUCCESS)
        }
    }
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<(), ScoreError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, format!("{rendered}\n"))?;
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
