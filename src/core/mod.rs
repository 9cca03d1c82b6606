pub mod ledger;
pub mod locks;
pub mod roster;
pub mod scoring;

pub use crate::domain::model::{
    EntryId, HistoryCell, HistoryRound, NewEntry, Player, PlayerId, RegisterOutcome, RoundNumber,
    RoundOutcome, ScoreEntry, Standing,
};
pub use crate::domain::ports::LedgerStore;
pub use crate::utils::error::Result;
