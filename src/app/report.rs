use crate::core::scoring::ScoringRules;
use crate::core::{HistoryRound, Player, RoundOutcome, ScoreEntry, Standing};
use crate::utils::error::Result;
use std::io;

const ABSENT: &str = "-";

fn name_width<'a>(names: impl Iterator<Item = &'a str>, header: &str) -> usize {
    names.map(str::len).chain(std::iter::once(header.len())).max().unwrap_or(0)
}

fn entry_cell(entry: Option<&ScoreEntry>) -> String {
    match entry {
        Some(e) => format!("{:+} ({}) #{}", e.adjusted, e.raw, e.id),
        None => ABSENT.to_string(),
    }
}

pub fn render_players(players: &[Player]) -> String {
    if players.is_empty() {
        return "No players registered.\n".to_string();
    }
    let width = name_width(players.iter().map(|p| p.name.as_str()), "Player");
    let mut out = format!("{:>4}  {:<width$}\n", "Id", "Player", width = width);
    for p in players {
        out.push_str(&format!("{:>4}  {:<width$}\n", p.id, p.name, width = width));
    }
    out
}

pub fn render_round(outcome: &RoundOutcome, players: &[Player]) -> String {
    let name_of = |entry: &ScoreEntry| {
        players
            .iter()
            .find(|p| p.id == entry.player_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("player {}", entry.player_id))
    };
    let names: Vec<String> = outcome.entries.iter().map(name_of).collect();
    let width = name_width(names.iter().map(String::as_str), "Player");

    let mut out = format!("Round {}\n", outcome.round);
    out.push_str(&format!(
        "{:>6}  {:<width$}  {:>6}  {:>8}\n",
        "Entry",
        "Player",
        "Raw",
        "Adjusted",
        width = width
    ));
    for (entry, name) in outcome.entries.iter().zip(&names) {
        out.push_str(&format!(
            "{:>6}  {:<width$}  {:>6}  {:>+8}\n",
            entry.id,
            name,
            entry.raw,
            entry.adjusted,
            width = width
        ));
    }
    out
}

fn leaderboard_header(rules: &ScoringRules) -> [String; 7] {
    [
        "Rank".to_string(),
        "Player".to_string(),
        "Total".to_string(),
        "Raw".to_string(),
        format!("={}", rules.exact_value),
        "Wins".to_string(),
        format!("{}-{}", rules.band_low, rules.band_high),
    ]
}

pub fn render_leaderboard(standings: &[Standing], rules: &ScoringRules) -> String {
    if standings.is_empty() {
        return "Leaderboard is empty.\n".to_string();
    }
    let header = leaderboard_header(rules);
    let width = name_width(standings.iter().map(|s| s.player.name.as_str()), &header[1]);

    let mut out = format!(
        "{:>4}  {:<width$}  {:>7}  {:>7}  {:>5}  {:>5}  {:>6}\n",
        header[0],
        header[1],
        header[2],
        header[3],
        header[4],
        header[5],
        header[6],
        width = width
    );
    for (rank, s) in standings.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<width$}  {:>+7}  {:>7}  {:>5}  {:>5}  {:>6}\n",
            rank + 1,
            s.player.name,
            s.adjusted_total,
            s.raw_total,
            s.exact_hits,
            s.wins,
            s.band_hits,
            width = width
        ));
    }
    out
}

pub fn write_leaderboard_csv<W: io::Write>(
    writer: W,
    standings: &[Standing],
    rules: &ScoringRules,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(leaderboard_header(rules))?;
    for (rank, s) in standings.iter().enumerate() {
        csv.write_record([
            (rank + 1).to_string(),
            s.player.name.clone(),
            s.adjusted_total.to_string(),
            s.raw_total.to_string(),
            s.exact_hits.to_string(),
            s.wins.to_string(),
            s.band_hits.to_string(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

pub fn render_history(rounds: &[HistoryRound]) -> String {
    let Some(first) = rounds.first() else {
        return "No rounds recorded.\n".to_string();
    };

    let cells: Vec<Vec<String>> = rounds
        .iter()
        .map(|r| r.cells.iter().map(|c| entry_cell(c.entry.as_ref())).collect())
        .collect();
    let widths: Vec<usize> = first
        .cells
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain(std::iter::once(c.player.name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = format!("{:>5}", "Round");
    for (cell, width) in first.cells.iter().zip(&widths) {
        out.push_str(&format!("  {:<width$}", cell.player.name, width = *width));
    }
    out.push('\n');
    for (round, row) in rounds.iter().zip(&cells) {
        out.push_str(&format!("{:>5}", round.round));
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str(&format!("  {:<width$}", cell, width = *width));
        }
        out.push('\n');
    }
    out
}

/// One row per round; each player contributes `raw` and `adjusted` columns,
/// left empty when the player was absent.
pub fn write_history_csv<W: io::Write>(writer: W, rounds: &[HistoryRound]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if let Some(first) = rounds.first() {
        let mut header = vec!["round".to_string()];
        for cell in &first.cells {
            header.push(format!("{} raw", cell.player.name));
            header.push(format!("{} adjusted", cell.player.name));
        }
        csv.write_record(&header)?;
    }
    for round in rounds {
        let mut record = vec![round.round.to_string()];
        for cell in &round.cells {
            match &cell.entry {
                Some(e) => {
                    record.push(e.raw.to_string());
                    record.push(e.adjusted.to_string());
                }
                None => {
                    record.push(String::new());
                    record.push(String::new());
                }
            }
        }
        csv.write_record(&record)?;
    }
    csv.flush()?;
    Ok(())
}
