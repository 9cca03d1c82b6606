use crate::core::{EntryId, LedgerStore, NewEntry, Player, PlayerId, RoundNumber, ScoreEntry};
use crate::utils::error::{LedgerError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Complete persisted state. Shared by the in-memory and file stores; every
/// method either applies fully or returns an error before touching `self`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    last_player_id: u64,
    last_entry_id: u64,
    players: Vec<Player>,
    entries: Vec<ScoreEntry>,
}

impl StoreState {
    pub fn create_player(&mut self, name: &str) -> Player {
        self.last_player_id += 1;
        let player = Player {
            id: PlayerId(self.last_player_id),
            name: name.to_string(),
        };
        self.players.push(player.clone());
        player
    }

    pub fn players(&self) -> Vec<Player> {
        self.players.clone()
    }

    pub fn next_round_number(&self) -> RoundNumber {
        self.entries.iter().map(|e| e.round).max().unwrap_or(0) + 1
    }

    pub fn insert_round(
        &mut self,
        round: RoundNumber,
        entries: Vec<NewEntry>,
    ) -> Result<Vec<ScoreEntry>> {
        if self.entries.iter().any(|e| e.round == round) {
            return Err(LedgerError::invariant(format!("round {} already recorded", round)));
        }
        if let Some(orphan) = entries
            .iter()
            .find(|n| !self.players.iter().any(|p| p.id == n.player_id))
        {
            return Err(LedgerError::not_found("player", orphan.player_id));
        }

        let created_at = Utc::now();
        let mut written = Vec::with_capacity(entries.len());
        for entry in entries {
            self.last_entry_id += 1;
            written.push(ScoreEntry {
                id: EntryId(self.last_entry_id),
                player_id: entry.player_id,
                round,
                raw: entry.raw,
                adjusted: entry.adjusted,
                created_at,
            });
        }
        self.entries.extend(written.iter().cloned());
        Ok(written)
    }

    pub fn round_entries(&self, round: RoundNumber) -> Vec<ScoreEntry> {
        self.entries.iter().filter(|e| e.round == round).cloned().collect()
    }

    pub fn entry(&self, id: EntryId) -> Result<ScoreEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found("entry", id))
    }

    pub fn replace_entries(&mut self, updated: &[ScoreEntry]) -> Result<()> {
        let mut positions = Vec::with_capacity(updated.len());
        for entry in updated {
            let idx = self
                .entries
                .iter()
                .position(|e| e.id == entry.id)
                .ok_or_else(|| LedgerError::not_found("entry", entry.id))?;
            positions.push(idx);
        }
        for (idx, entry) in positions.into_iter().zip(updated) {
            let stored = &mut self.entries[idx];
            stored.raw = entry.raw;
            stored.adjusted = entry.adjusted;
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.entries.clone()
    }

    pub fn clear_players(&mut self) {
        self.players.clear();
    }

    pub fn clear_rounds(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn create_player(&self, name: &str) -> Result<Player> {
        Ok(self.state.write().await.create_player(name))
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.state.read().await.players())
    }

    async fn delete_all_players(&self) -> Result<()> {
        self.state.write().await.clear_players();
        Ok(())
    }

    async fn next_round_number(&self) -> Result<RoundNumber> {
        Ok(self.state.read().await.next_round_number())
    }

    async fn write_round_entries(
        &self,
        round: RoundNumber,
        entries: Vec<NewEntry>,
    ) -> Result<Vec<ScoreEntry>> {
        self.state.write().await.insert_round(round, entries)
    }

    async fn read_round_entries(&self, round: RoundNumber) -> Result<Vec<ScoreEntry>> {
        Ok(self.state.read().await.round_entries(round))
    }

    async fn read_entry(&self, id: EntryId) -> Result<ScoreEntry> {
        self.state.read().await.entry(id)
    }

    async fn write_round(&self, entries: &[ScoreEntry]) -> Result<()> {
        self.state.write().await.replace_entries(entries)
    }

    async fn list_entries(&self) -> Result<Vec<ScoreEntry>> {
        Ok(self.state.read().await.entries())
    }

    async fn delete_all_rounds(&self) -> Result<()> {
        self.state.write().await.clear_rounds();
        Ok(())
    }

    async fn reset_all(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.clear_rounds();
        state.clear_players();
        Ok(())
    }
}
