use crate::core::{LedgerStore, Player, RegisterOutcome};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::normalize_name;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Registered players. Names are unique after normalization.
///
/// The roster also owns the gate that orders mutations against a full
/// reset; the ledger shares it.
pub struct Roster<S: LedgerStore> {
    store: Arc<S>,
    gate: Arc<RwLock<()>>,
}

impl<S: LedgerStore> Clone for Roster<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gate: Arc::clone(&self.gate),
        }
    }
}

impl<S: LedgerStore> Roster<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            gate: Arc::new(RwLock::new(())),
        }
    }

    pub(crate) fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub(crate) fn gate(&self) -> &Arc<RwLock<()>> {
        &self.gate
    }

    /// Adds every name not already on the roster. Duplicates, whether of an
    /// existing player or earlier in the same batch, land in `rejected`.
    pub async fn register<I, T>(&self, names: I) -> Result<RegisterOutcome>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let candidates: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        if candidates.is_empty() {
            return Err(LedgerError::validation("no player names given"));
        }

        let _gate = self.gate.write().await;
        let mut taken: HashSet<String> = self
            .store
            .list_players()
            .await?
            .iter()
            .map(|p| normalize_name(&p.name))
            .collect();

        let mut outcome = RegisterOutcome {
            added: Vec::new(),
            rejected: Vec::new(),
        };
        for name in candidates {
            if !taken.insert(normalize_name(&name)) {
                tracing::debug!(name = %name, "skipping duplicate player");
                outcome.rejected.push(name);
                continue;
            }
            outcome.added.push(self.store.create_player(&name).await?);
        }

        tracing::info!(
            added = outcome.added.len(),
            rejected = outcome.rejected.len(),
            "registered players"
        );
        Ok(outcome)
    }

    /// Players sorted by display name.
    pub async fn list(&self) -> Result<Vec<Player>> {
        let mut players = self.store.list_players().await?;
        players.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(players)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Player> {
        let key = normalize_name(name);
        self.store
            .list_players()
            .await?
            .into_iter()
            .find(|p| normalize_name(&p.name) == key)
            .ok_or_else(|| LedgerError::not_found("player", name.trim()))
    }

    /// Removes every player together with all rounds and entries.
    pub async fn reset_all(&self) -> Result<()> {
        let _gate = self.gate.write().await;
        self.store.reset_all().await?;
        tracing::info!("roster and ledger reset");
        Ok(())
    }
}
