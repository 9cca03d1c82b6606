pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{JsonFileStore, MemoryStore};
pub use config::LedgerConfig;
pub use crate::core::{ledger::Ledger, roster::Roster, scoring::ScoringRules};
pub use domain::ports::LedgerStore;
pub use utils::error::{ErrorKind, LedgerError, Result};
