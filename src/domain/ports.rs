use crate::domain::model::{EntryId, NewEntry, Player, RoundNumber, ScoreEntry};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Persistence consumed by the roster and the ledger.
///
/// Every method is a single transaction: implementations must make all of a
/// call's writes visible together or not at all.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn create_player(&self, name: &str) -> Result<Player>;

    async fn list_players(&self) -> Result<Vec<Player>>;

    async fn delete_all_players(&self) -> Result<()>;

    /// Highest persisted round number plus one, or 1 on an empty ledger.
    async fn next_round_number(&self) -> Result<RoundNumber>;

    async fn write_round_entries(
        &self,
        round: RoundNumber,
        entries: Vec<NewEntry>,
    ) -> Result<Vec<ScoreEntry>>;

    /// Entries of `round`, in insertion order. Empty when the round is unknown.
    async fn read_round_entries(&self, round: RoundNumber) -> Result<Vec<ScoreEntry>>;

    /// Fails with `NotFound` when no entry has this id.
    async fn read_entry(&self, id: EntryId) -> Result<ScoreEntry>;

    /// Replaces `raw` and `adjusted` of existing entries. Fails with `NotFound`
    /// without writing anything if any id is unknown.
    async fn write_round(&self, entries: &[ScoreEntry]) -> Result<()>;

    async fn list_entries(&self) -> Result<Vec<ScoreEntry>>;

    async fn delete_all_rounds(&self) -> Result<()>;

    async fn reset_all(&self) -> Result<()> {
        self.delete_all_rounds().await?;
        self.delete_all_players().await
    }
}
