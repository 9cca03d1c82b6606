use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type RoundNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// One player's result in one round. `(player_id, round)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub id: EntryId,
    pub player_id: PlayerId,
    pub round: RoundNumber,
    pub raw: u32,
    pub adjusted: i64,
    pub created_at: DateTime<Utc>,
}

/// Entry data for a round that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub player_id: PlayerId,
    pub raw: u32,
    pub adjusted: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundOutcome {
    pub round: RoundNumber,
    pub entries: Vec<ScoreEntry>,
}

impl RoundOutcome {
    pub fn entry_for(&self, player_id: PlayerId) -> Option<&ScoreEntry> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub added: Vec<Player>,
    pub rejected: Vec<String>,
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player: Player,
    pub adjusted_total: i64,
    pub raw_total: i64,
    pub exact_hits: u32,
    pub wins: u32,
    pub band_hits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryCell {
    pub player: Player,
    /// `None` when the player was not part of the round.
    pub entry: Option<ScoreEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRound {
    pub round: RoundNumber,
    pub cells: Vec<HistoryCell>,
}
