use rummy_ledger::core::{Player, PlayerId, ScoreEntry};
use rummy_ledger::{ErrorKind, Ledger, MemoryStore, Roster, ScoringRules};
use std::collections::BTreeMap;
use std::sync::Arc;

async fn setup(names: &[&str]) -> (Ledger<MemoryStore>, Vec<Player>) {
    let roster = Roster::new(Arc::new(MemoryStore::new()));
    roster.register(names.iter().copied()).await.unwrap();
    let players = roster.list().await.unwrap();
    (Ledger::new(roster, ScoringRules::default()), players)
}

fn raw(players: &[Player], values: &[i64]) -> BTreeMap<PlayerId, i64> {
    players.iter().map(|p| p.id).zip(values.iter().copied()).collect()
}

/// Serialized views, compared to prove a rejected call changed nothing.
async fn snapshot(ledger: &Ledger<MemoryStore>) -> (String, String) {
    (
        serde_json::to_string(&ledger.leaderboard().await.unwrap()).unwrap(),
        serde_json::to_string(&ledger.history().await.unwrap()).unwrap(),
    )
}

async fn assert_round_invariants(ledger: &Ledger<MemoryStore>) {
    for round in ledger.history().await.unwrap() {
        let entries: Vec<&ScoreEntry> =
            round.cells.iter().filter_map(|c| c.entry.as_ref()).collect();
        let balance: i64 = entries.iter().map(|e| e.adjusted).sum();
        assert_eq!(balance, 0, "round {} is unbalanced", round.round);
        let winners = entries.iter().filter(|e| e.raw == 0).count();
        assert_eq!(winners, 1, "round {} has {} winners", round.round, winners);
    }
}

#[tokio::test]
async fn test_derivation_example() {
    let (ledger, p) = setup(&["A", "B", "C"]).await;

    let outcome = ledger.submit_round(&raw(&p, &[0, 10, 15])).await.unwrap();

    assert_eq!(outcome.round, 1);
    assert_eq!(outcome.entry_for(p[0].id).unwrap().adjusted, 25);
    assert_eq!(outcome.entry_for(p[1].id).unwrap().adjusted, -10);
    assert_eq!(outcome.entry_for(p[2].id).unwrap().adjusted, -15);
    assert_eq!(outcome.entries.iter().map(|e| e.adjusted).sum::<i64>(), 0);
    assert_round_invariants(&ledger).await;
}

#[tokio::test]
async fn test_edit_creating_second_winner_is_rejected() {
    let (ledger, p) = setup(&["A", "B", "C"]).await;
    let outcome = ledger.submit_round(&raw(&p, &[0, 10, 15])).await.unwrap();
    let before = snapshot(&ledger).await;

    let b_entry = outcome.entry_for(p[1].id).unwrap().id;
    let err = ledger.edit_entry(b_entry, 0).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    let round = ledger.round(1).await.unwrap();
    assert_eq!(round.entry_for(p[0].id).unwrap().adjusted, 25);
    assert_eq!(round.entry_for(p[1].id).unwrap().adjusted, -10);
    assert_eq!(round.entry_for(p[1].id).unwrap().raw, 10);
    assert_eq!(round.entry_for(p[2].id).unwrap().adjusted, -15);
    assert_eq!(snapshot(&ledger).await, before);
}

#[tokio::test]
async fn test_edit_removing_the_winner_is_rejected() {
    let (ledger, p) = setup(&["A", "B", "C"]).await;
    let outcome = ledger.submit_round(&raw(&p, &[0, 10, 15])).await.unwrap();
    let before = snapshot(&ledger).await;

    let a_entry = outcome.entry_for(p[0].id).unwrap().id;
    let err = ledger.edit_entry(a_entry, 5).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvariantViolation);
    assert_eq!(snapshot(&ledger).await, before);
}

#[tokio::test]
async fn test_valid_edit_rederives_whole_round() {
    let (ledger, p) = setup(&["A", "B", "C"]).await;
    let outcome = ledger.submit_round(&raw(&p, &[0, 10, 15])).await.unwrap();

    // Non-winner correction: the winner's gain follows.
    let c_entry = outcome.entry_for(p[2].id).unwrap().id;
    let edited = ledger.edit_entry(c_entry, 30).await.unwrap();
    assert_eq!(edited.entry_for(p[0].id).unwrap().adjusted, 40);
    assert_eq!(edited.entry_for(p[1].id).unwrap().adjusted, -10);
    assert_eq!(edited.entry_for(p[2].id).unwrap().adjusted, -30);

    let stored = ledger.round(1).await.unwrap();
    assert_eq!(stored.entries, edited.entries);
    assert_round_invariants(&ledger).await;
}

#[tokio::test]
async fn test_edit_only_touches_its_round() {
    let (ledger, p) = setup(&["A", "B"]).await;
    let first = ledger.submit_round(&raw(&p, &[0, 10])).await.unwrap();
    ledger.submit_round(&raw(&p, &[7, 0])).await.unwrap();
    let second_before = ledger.round(2).await.unwrap();

    ledger
        .edit_entry(first.entry_for(p[1].id).unwrap().id, 3)
        .await
        .unwrap();

    assert_eq!(ledger.round(2).await.unwrap(), second_before);
    let board = ledger.leaderboard().await.unwrap();
    // A: +3 -7 = -4, B: -3 +7 = 4
    assert_eq!(board[0].player.name, "B");
    assert_eq!(board[0].adjusted_total, 4);
    assert_eq!(board[1].adjusted_total, -4);
}

#[tokio::test]
async fn test_rejected_submissions_change_nothing() {
    let (ledger, p) = setup(&["A", "B", "C"]).await;
    ledger.submit_round(&raw(&p, &[0, 4, 6])).await.unwrap();
    let before = snapshot(&ledger).await;

    let negative = ledger.submit_round(&raw(&p, &[0, -4, 6])).await.unwrap_err();
    assert_eq!(negative.kind(), ErrorKind::InvalidInput);
    assert!(negative.to_string().contains("zero or positive"));

    let missing = ledger.submit_round(&raw(&p[..2], &[0, 4])).await.unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::InvalidInput);

    let two_winners = ledger.submit_round(&raw(&p, &[0, 0, 6])).await.unwrap_err();
    assert_eq!(two_winners.kind(), ErrorKind::InvariantViolation);

    let no_winner = ledger.submit_round(&raw(&p, &[1, 2, 3])).await.unwrap_err();
    assert_eq!(no_winner.kind(), ErrorKind::InvariantViolation);

    let mut stranger = raw(&p, &[0, 4, 6]);
    stranger.insert(PlayerId(999), 1);
    let unknown = ledger.submit_round(&stranger).await.unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::NotFound);

    assert_eq!(snapshot(&ledger).await, before);
}

#[tokio::test]
async fn test_negative_wins_over_winner_count() {
    let (ledger, p) = setup(&["A", "B"]).await;
    // Two problems at once: no zero and a negative value.
    let err = ledger.submit_round(&raw(&p, &[-1, 5])).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_leaderboard_aggregates_and_ordering() {
    let (ledger, p) = setup(&["dan", "amy", "cal", "bea"]).await;
    // Name order: amy, bea, cal, dan
    ledger.submit_round(&raw(&p, &[0, 20, 75, 5])).await.unwrap();
    ledger.submit_round(&raw(&p, &[100, 0, 20, 80])).await.unwrap();

    let board = ledger.leaderboard().await.unwrap();
    let names: Vec<&str> = board.iter().map(|s| s.player.name.as_str()).collect();
    // amy: 100 - 100 = 0; bea: -20 + 200 = 180; cal: -75 - 20 = -95; dan: -5 - 80 = -85
    assert_eq!(names, vec!["bea", "amy", "dan", "cal"]);

    let bea = &board[0];
    assert_eq!(bea.adjusted_total, 180);
    assert_eq!(bea.raw_total, 20);
    assert_eq!(bea.exact_hits, 1);
    assert_eq!(bea.wins, 1);
    assert_eq!(bea.band_hits, 0);

    let cal = &board[3];
    assert_eq!(cal.exact_hits, 1);
    assert_eq!(cal.band_hits, 1);

    let dan = &board[2];
    assert_eq!(dan.band_hits, 1);
    assert_eq!(dan.raw_total, 85);
}

#[tokio::test]
async fn test_leaderboard_ties_break_by_name() {
    let (ledger, p) = setup(&["zed", "max", "ada"]).await;
    let board = ledger.leaderboard().await.unwrap();
    let names: Vec<&str> = board.iter().map(|s| s.player.name.as_str()).collect();
    assert_eq!(names, vec!["ada", "max", "zed"]);
    assert!(board.iter().all(|s| s.adjusted_total == 0 && s.wins == 0));

    // ada wins, max and zed lose the same amount
    ledger.submit_round(&raw(&p, &[0, 9, 9])).await.unwrap();
    let board = ledger.leaderboard().await.unwrap();
    let names: Vec<&str> = board.iter().map(|s| s.player.name.as_str()).collect();
    assert_eq!(names, vec!["ada", "max", "zed"]);
}

#[tokio::test]
async fn test_history_marks_players_missing_from_old_rounds() {
    let (ledger, p) = setup(&["A", "B"]).await;
    ledger.submit_round(&raw(&p, &[0, 12])).await.unwrap();

    ledger.roster().register(["C"]).await.unwrap();
    let p = ledger.roster().list().await.unwrap();
    ledger.submit_round(&raw(&p, &[3, 0, 4])).await.unwrap();

    let history = ledger.history().await.unwrap();
    assert_eq!(history.len(), 2);
    let first = &history[0];
    assert_eq!(first.round, 1);
    let names: Vec<&str> = first.cells.iter().map(|c| c.player.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert!(first.cells[0].entry.is_some());
    assert!(first.cells[2].entry.is_none());
    assert!(history[1].cells.iter().all(|c| c.entry.is_some()));
}

#[tokio::test]
async fn test_stale_round_edits_use_its_own_entries() {
    let (ledger, p) = setup(&["A", "B"]).await;
    let first = ledger.submit_round(&raw(&p, &[0, 12])).await.unwrap();
    ledger.roster().register(["C"]).await.unwrap();

    let edited = ledger
        .edit_entry(first.entry_for(p[1].id).unwrap().id, 8)
        .await
        .unwrap();
    assert_eq!(edited.entries.len(), 2);
    assert_eq!(edited.entry_for(p[0].id).unwrap().adjusted, 8);
    assert_round_invariants(&ledger).await;
}

#[tokio::test]
async fn test_reset_completeness() {
    let (ledger, p) = setup(&["A", "B"]).await;
    ledger.submit_round(&raw(&p, &[0, 12])).await.unwrap();

    ledger.reset_all().await.unwrap();

    assert!(ledger.leaderboard().await.unwrap().is_empty());
    assert!(ledger.history().await.unwrap().is_empty());
    assert!(ledger.roster().list().await.unwrap().is_empty());

    // Numbering restarts once everything is gone.
    let p = ledger.roster().register(["X", "Y"]).await.unwrap().added;
    let outcome = ledger.submit_round(&raw(&p, &[0, 1])).await.unwrap();
    assert_eq!(outcome.round, 1);
}

#[tokio::test]
async fn test_roster_reset_cascades() {
    let (ledger, p) = setup(&["A", "B"]).await;
    ledger.submit_round(&raw(&p, &[0, 12])).await.unwrap();

    ledger.roster().reset_all().await.unwrap();

    assert!(ledger.leaderboard().await.unwrap().is_empty());
    assert!(ledger.history().await.unwrap().is_empty());
}
