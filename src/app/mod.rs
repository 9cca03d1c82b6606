// Application layer: the command-line caller of the ledger.

#[cfg(feature = "cli")]
pub mod commands;
pub mod report;
