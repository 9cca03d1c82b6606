use crate::config::toml_config::LedgerConfig;
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "rummy-ledger")]
#[command(about = "Keeps score across rounds of a rummy game")]
pub struct CliConfig {
    /// Ledger file (overrides `storage.path` from the config file)
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register players (comma or space separated)
    Register {
        #[arg(required = true, value_delimiter = ',')]
        names: Vec<String>,
    },
    /// List registered players
    Players,
    /// Record a round as NAME=SCORE pairs; exactly one player scores 0
    Submit {
        #[arg(required = true, allow_hyphen_values = true)]
        scores: Vec<String>,
    },
    /// Correct the raw score of one entry
    Edit {
        entry: u64,
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
    /// Show cumulative standings
    Leaderboard {
        #[arg(long)]
        csv: bool,
    },
    /// Show every round
    History {
        #[arg(long)]
        csv: bool,
    },
    /// Delete all players and rounds
    Reset {
        #[arg(long, help = "Confirm the reset")]
        yes: bool,
    },
}

impl CliConfig {
    /// Loads the TOML file if given and applies command-line overrides.
    pub fn resolve(&self) -> Result<LedgerConfig> {
        let mut config = match &self.config {
            Some(path) => LedgerConfig::from_file(path)?,
            None => LedgerConfig::default(),
        };
        if let Some(data) = &self.data {
            config.storage.path = data.clone();
        }
        config.logging.verbose |= self.verbose;
        config.logging.json |= self.json_logs;
        config.validate()?;
        Ok(config)
    }
}

/// Splits a `NAME=SCORE` argument.
pub fn parse_assignment(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((name, score)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), score.trim().to_string()))
        }
        _ => Err(LedgerError::invalid_input(arg, "expected NAME=SCORE")),
    }
}
