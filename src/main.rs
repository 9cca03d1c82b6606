use clap::Parser;
use rummy_ledger::app::commands;
use rummy_ledger::utils::logger;
use rummy_ledger::{CliConfig, ErrorKind, JsonFileStore, Ledger, LedgerError, Roster};
use std::sync::Arc;

fn exit_code(error: &LedgerError) -> i32 {
    match error.kind() {
        ErrorKind::Validation | ErrorKind::InvalidInput => 2,
        ErrorKind::InvariantViolation => 3,
        ErrorKind::NotFound => 4,
        ErrorKind::Config => 5,
        ErrorKind::Storage => 1,
    }
}

fn report_failure(error: &LedgerError) -> ! {
    tracing::error!("❌ {} (kind: {:?})", error, error.kind());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code(error));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose);
            report_failure(&e);
        }
    };

    if config.logging.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.logging.verbose);
    }
    tracing::debug!("resolved config: {:?}", config);

    let store = match JsonFileStore::open(&config.storage.path) {
        Ok(store) => Arc::new(store),
        Err(e) => report_failure(&e),
    };
    let ledger = Ledger::new(Roster::new(store), config.scoring);

    match commands::run(&ledger, cli.command).await {
        Ok(output) => print!("{}", output),
        Err(e) => report_failure(&e),
    }

    Ok(())
}
