use crate::app::report;
use crate::config::cli::{parse_assignment, Command};
use crate::core::ledger::Ledger;
use crate::core::{EntryId, LedgerStore};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::parse_score;

/// Executes one CLI command and returns the text to print.
pub async fn run<S: LedgerStore>(ledger: &Ledger<S>, command: Command) -> Result<String> {
    match command {
        Command::Register { names } => {
            let names = names.iter().flat_map(|n| n.split(','));
            let outcome = ledger.roster().register(names).await?;
            let mut out = String::new();
            for player in &outcome.added {
                out.push_str(&format!("added {} (id {})\n", player.name, player.id));
            }
            for name in &outcome.rejected {
                out.push_str(&format!("skipped {} (already registered)\n", name));
            }
            Ok(out)
        }
        Command::Players => Ok(report::render_players(&ledger.roster().list().await?)),
        Command::Submit { scores } => {
            let pairs = scores
                .iter()
                .map(|s| parse_assignment(s))
                .collect::<Result<Vec<_>>>()?;
            let outcome = ledger.submit_named(&pairs).await?;
            Ok(report::render_round(&outcome, &ledger.roster().list().await?))
        }
        Command::Edit { entry, raw } => {
            let field = format!("entry {}", entry);
            let outcome = ledger
                .edit_entry(EntryId(entry), parse_score(&field, &raw)?)
                .await?;
            Ok(report::render_round(&outcome, &ledger.roster().list().await?))
        }
        Command::Leaderboard { csv } => {
            let standings = ledger.leaderboard().await?;
            if csv {
                let mut buf = Vec::new();
                report::write_leaderboard_csv(&mut buf, &standings, ledger.rules())?;
                Ok(String::from_utf8_lossy(&buf).into_owned())
            } else {
                Ok(report::render_leaderboard(&standings, ledger.rules()))
            }
        }
        Command::History { csv } => {
            let rounds = ledger.history().await?;
            if csv {
                let mut buf = Vec::new();
                report::write_history_csv(&mut buf, &rounds)?;
                Ok(String::from_utf8_lossy(&buf).into_owned())
            } else {
                Ok(report::render_history(&rounds))
            }
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(LedgerError::validation("reset needs --yes to confirm"));
            }
            ledger.reset_all().await?;
            Ok("All players and rounds deleted.\n".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::core::roster::Roster;
    use crate::core::scoring::ScoringRules;
    use crate::utils::error::ErrorKind;
    use std::sync::Arc;

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::new(Roster::new(Arc::new(MemoryStore::new())), ScoringRules::default())
    }

    #[tokio::test]
    async fn test_register_submit_and_leaderboard() {
        let ledger = ledger();
        let out = run(
            &ledger,
            Command::Register {
                names: vec!["ann".into(), "bo,cy".into(), "Ann".into()],
            },
        )
        .await
        .unwrap();
        assert!(out.contains("added cy"));
        assert!(out.contains("skipped Ann"));

        run(
            &ledger,
            Command::Submit {
                scores: vec!["ann=0".into(), "bo=20".into(), "cy=75".into()],
            },
        )
        .await
        .unwrap();

        let csv = run(&ledger, Command::Leaderboard { csv: true }).await.unwrap();
        assert_eq!(
            csv,
            "Rank,Player,Total,Raw,=20,Wins,70-80\n\
             1,ann,95,0,0,1,0\n\
             2,bo,-20,20,1,0,0\n\
             3,cy,-75,75,0,0,1\n"
        );
    }

    #[tokio::test]
    async fn test_edit_rejects_text() {
        let ledger = ledger();
        let err = run(
            &ledger,
            Command::Edit {
                entry: 1,
                raw: "lots".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_reset_needs_confirmation() {
        let ledger = ledger();
        run(
            &ledger,
            Command::Register {
                names: vec!["ann".into()],
            },
        )
        .await
        .unwrap();
        let err = run(&ledger, Command::Reset { yes: false }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(ledger.roster().list().await.unwrap().len(), 1);

        run(&ledger, Command::Reset { yes: true }).await.unwrap();
        assert!(ledger.roster().list().await.unwrap().is_empty());
    }
}
