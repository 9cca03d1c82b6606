use crate::core::locks::RoundLocks;
use crate::core::roster::Roster;
use crate::core::scoring::{derive_round, validate_submission, ScoringRules};
use crate::core::{
    EntryId, HistoryCell, HistoryRound, LedgerStore, NewEntry, PlayerId, RoundNumber,
    RoundOutcome, ScoreEntry, Standing,
};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::{ensure_non_negative, parse_score, validate_non_negative};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Round scoring ledger: owns rounds and their score entries.
///
/// Mutations hold the roster gate for reading so a reset never interleaves
/// with them. Round creation is serialized by `creation`; edits are
/// serialized per round by `round_locks`.
pub struct Ledger<S: LedgerStore> {
    roster: Roster<S>,
    store: Arc<S>,
    rules: ScoringRules,
    creation: Mutex<()>,
    round_locks: RoundLocks,
}

impl<S: LedgerStore> Ledger<S> {
    pub fn new(roster: Roster<S>, rules: ScoringRules) -> Self {
        let store = Arc::clone(roster.store());
        Self {
            roster,
            store,
            rules,
            creation: Mutex::new(()),
            round_locks: RoundLocks::new(),
        }
    }

    pub fn roster(&self) -> &Roster<S> {
        &self.roster
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Records a new round. `raw_by_player` must hold a score for every
    /// registered player and nobody else.
    pub async fn submit_round(
        &self,
        raw_by_player: &BTreeMap<PlayerId, i64>,
    ) -> Result<RoundOutcome> {
        let _gate = self.roster.gate().read().await;
        let players = self.roster.list().await?;

        let validated = validate_submission(&players, raw_by_player).inspect_err(|e| {
            tracing::warn!(error = %e, "round submission rejected");
        })?;
        let adjusted = derive_round(&validated)?;

        let entries: Vec<NewEntry> = players
            .iter()
            .filter_map(|p| {
                Some(NewEntry {
                    player_id: p.id,
                    raw: *validated.get(&p.id)?,
                    adjusted: *adjusted.get(&p.id)?,
                })
            })
            .collect();

        let _creation = self.creation.lock().await;
        let round = self.store.next_round_number().await?;
        let entries = self.store.write_round_entries(round, entries).await?;

        tracing::info!(round, players = entries.len(), "round recorded");
        Ok(RoundOutcome { round, entries })
    }

    /// Submits a round keyed by player name with unparsed score text.
    pub async fn submit_named<N, V>(&self, scores: &[(N, V)]) -> Result<RoundOutcome>
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let parsed: Vec<(&str, Result<i64>)> = scores
            .iter()
            .map(|(name, text)| {
                let name = name.as_ref();
                (name, parse_score(name.trim(), text.as_ref()))
            })
            .collect();

        // Negative values are reported ahead of unparseable ones.
        for (name, value) in &parsed {
            if let Ok(v) = value {
                ensure_non_negative(name.trim(), *v)?;
            }
        }

        let mut raw_by_player = BTreeMap::new();
        for (name, value) in parsed {
            let value = value?;
            let player = self.roster.find_by_name(name).await?;
            if raw_by_player.insert(player.id, value).is_some() {
                return Err(LedgerError::invalid_input(player.name, "score given twice"));
            }
        }

        self.submit_round(&raw_by_player).await
    }

    /// Changes one entry's raw score and re-derives its whole round.
    ///
    /// The change is computed on a working copy of the round; if it leaves the
    /// round without exactly one winner nothing is written.
    pub async fn edit_entry(&self, entry_id: EntryId, new_raw: i64) -> Result<RoundOutcome> {
        let new_raw = validate_non_negative(&format!("entry {}", entry_id), new_raw)?;

        let _gate = self.roster.gate().read().await;
        let target = self.store.read_entry(entry_id).await?;
        let _round_guard = self.round_locks.lock(target.round).await;

        let mut working = self.store.read_round_entries(target.round).await?;
        let slot = working
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| LedgerError::not_found("entry", entry_id))?;
        let previous = slot.raw;
        slot.raw = new_raw;

        let raw_by_player: BTreeMap<PlayerId, u32> =
            working.iter().map(|e| (e.player_id, e.raw)).collect();
        let adjusted = derive_round(&raw_by_player).inspect_err(|e| {
            tracing::warn!(entry = %entry_id, round = target.round, error = %e, "edit rejected");
        })?;
        for entry in &mut working {
            if let Some(value) = adjusted.get(&entry.player_id) {
                entry.adjusted = *value;
            }
        }

        self.store.write_round(&working).await?;
        tracing::info!(
            entry = %entry_id,
            round = target.round,
            from = previous,
            to = new_raw,
            "entry corrected"
        );
        Ok(RoundOutcome {
            round: target.round,
            entries: working,
        })
    }

    pub async fn round(&self, round: RoundNumber) -> Result<RoundOutcome> {
        let entries = self.store.read_round_entries(round).await?;
        if entries.is_empty() {
            return Err(LedgerError::not_found("round", round));
        }
        Ok(RoundOutcome { round, entries })
    }

    /// Cumulative standings, best adjusted total first. Ties go to the
    /// alphabetically smaller name.
    pub async fn leaderboard(&self) -> Result<Vec<Standing>> {
        let _gate = self.roster.gate().read().await;
        let players = self.roster.list().await?;
        let entries = self.store.list_entries().await?;

        let mut by_player: HashMap<PlayerId, Standing> = players
            .into_iter()
            .map(|player| {
                (
                    player.id,
                    Standing {
                        player,
                        adjusted_total: 0,
                        raw_total: 0,
                        exact_hits: 0,
                        wins: 0,
                        band_hits: 0,
                    },
                )
            })
            .collect();

        for entry in entries {
            let Some(row) = by_player.get_mut(&entry.player_id) else {
                continue;
            };
            row.adjusted_total += entry.adjusted;
            row.raw_total += i64::from(entry.raw);
            if self.rules.is_exact_hit(entry.raw) {
                row.exact_hits += 1;
            }
            if entry.raw == 0 {
                row.wins += 1;
            }
            if self.rules.is_band_hit(entry.raw) {
                row.band_hits += 1;
            }
        }

        let mut standings: Vec<Standing> = by_player.into_values().collect();
        standings.sort_by(|a, b| {
            b.adjusted_total
                .cmp(&a.adjusted_total)
                .then_with(|| a.player.name.cmp(&b.player.name))
                .then_with(|| a.player.id.cmp(&b.player.id))
        });
        Ok(standings)
    }

    /// Every round in order, with one cell per registered player.
    pub async fn history(&self) -> Result<Vec<HistoryRound>> {
        let _gate = self.roster.gate().read().await;
        let players = self.roster.list().await?;

        let mut rounds: BTreeMap<RoundNumber, HashMap<PlayerId, ScoreEntry>> = BTreeMap::new();
        for entry in self.store.list_entries().await? {
            rounds
                .entry(entry.round)
                .or_default()
                .insert(entry.player_id, entry);
        }

        Ok(rounds
            .into_iter()
            .map(|(round, mut entries)| HistoryRound {
                round,
                cells: players
                    .iter()
                    .map(|player| HistoryCell {
                        player: player.clone(),
                        entry: entries.remove(&player.id),
                    })
                    .collect(),
            })
            .collect())
    }

    /// Destroys all players, rounds and entries.
    pub async fn reset_all(&self) -> Result<()> {
        let _gate = self.roster.gate().write().await;
        self.store.reset_all().await?;
        self.round_locks.clear();
        tracing::info!("ledger reset");
        Ok(())
    }
}
