//! Round validation and adjusted-score derivation.
//!
//! Within a round exactly one player reports a raw score of zero. That winner
//! collects the sum of everybody else's raw scores, and every other player
//! loses their own raw score, so adjusted scores in a round always sum to zero.

use crate::domain::model::{Player, PlayerId};
use crate::utils::error::{LedgerError, Result};
use crate::utils::validation::{ensure_non_negative, validate_non_negative};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw-score milestones counted on the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub exact_value: u32,
    pub band_low: u32,
    pub band_high: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            exact_value: 20,
            band_low: 70,
            band_high: 80,
        }
    }
}

impl ScoringRules {
    pub fn is_exact_hit(&self, raw: u32) -> bool {
        raw == self.exact_value
    }

    pub fn is_band_hit(&self, raw: u32) -> bool {
        (self.band_low..=self.band_high).contains(&raw)
    }
}

/// Derives adjusted scores for one complete round.
///
/// Fails with `InvariantViolation` unless exactly one raw score is zero.
pub fn derive_round(raw_by_player: &BTreeMap<PlayerId, u32>) -> Result<BTreeMap<PlayerId, i64>> {
    let winners: Vec<PlayerId> = raw_by_player
        .iter()
        .filter(|(_, raw)| **raw == 0)
        .map(|(id, _)| *id)
        .collect();

    let winner = match winners.as_slice() {
        [single] => *single,
        [] => {
            return Err(LedgerError::invariant(
                "exactly one winner required (no player scored 0)",
            ))
        }
        many => {
            return Err(LedgerError::invariant(format!(
                "exactly one winner required ({} players scored 0)",
                many.len()
            )))
        }
    };

    let total: i64 = raw_by_player.values().map(|raw| i64::from(*raw)).sum();
    tracing::debug!(winner = %winner, total, "derived round");

    Ok(raw_by_player
        .iter()
        .map(|(id, raw)| {
            let adjusted = if *id == winner { total } else { -i64::from(*raw) };
            (*id, adjusted)
        })
        .collect())
}

/// Checks a submission against the roster and returns the validated raw scores.
///
/// Checks run in a fixed order and the first failure wins: negative values,
/// then values too large to store, then players without a score, then ids
/// outside the roster, then the single-winner rule.
pub fn validate_submission(
    roster: &[Player],
    raw_by_player: &BTreeMap<PlayerId, i64>,
) -> Result<BTreeMap<PlayerId, u32>> {
    let label = |id: PlayerId| {
        roster
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("player {}", id))
    };

    for (id, value) in raw_by_player {
        ensure_non_negative(&label(*id), *value)?;
    }

    let mut validated = BTreeMap::new();
    for (id, value) in raw_by_player {
        validated.insert(*id, validate_non_negative(&label(*id), *value)?);
    }

    if let Some(missing) = roster.iter().find(|p| !raw_by_player.contains_key(&p.id)) {
        return Err(LedgerError::invalid_input(&missing.name, "score is missing"));
    }

    if let Some(unknown) = raw_by_player
        .keys()
        .find(|id| !roster.iter().any(|p| p.id == **id))
    {
        return Err(LedgerError::not_found("player", unknown));
    }

    derive_round(&validated)?;
    Ok(validated)
}
