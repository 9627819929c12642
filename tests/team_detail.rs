use std::collections::HashMap;

use fpl_h2h_terminal::fpl_fetch::{EntryProfile, HistoryRow, Pick};
use fpl_h2h_terminal::standings::StandingRow;
use fpl_h2h_terminal::stats::{MatchRecord, MatchesByGameweek, Outcome, TeamStats};
use fpl_h2h_terminal::team_detail::{
    CaptainTally, UNKNOWN_OPPONENT, build_team_detail, captain_name, format_thousands,
    head_to_head_results, tally_captains,
};

fn row(id: u32, name: &str) -> StandingRow {
    StandingRow {
        id,
        name: name.to_string(),
        manager_name: String::new(),
        league_rank: id,
        h2h_points: 0,
        total_points: 0,
        stats: TeamStats::default(),
    }
}

fn record(gameweek: u32, a: (u32, i32), b: (u32, i32)) -> MatchRecord {
    MatchRecord {
        gameweek,
        team1_id: a.0,
        team1_points: a.1,
        team2_id: b.0,
        team2_points: b.1,
    }
}

fn pick(element: u32, is_captain: bool) -> Pick {
    Pick {
        element,
        is_captain,
        is_vice_captain: false,
        multiplier: if is_captain { 2 } else { 1 },
    }
}

fn history_row(event: u32, points: i32, total: i32, rank: Option<u64>) -> HistoryRow {
    HistoryRow {
        event,
        points,
        total_points: total,
        overall_rank: rank,
    }
}

#[test]
fn tally_orders_by_count_descending() {
    let names = ["Haaland", "Salah", "Haaland", "Palmer", "Haaland", "Salah"];
    let tally = tally_captains(names);
    assert_eq!(
        tally,
        vec![
            CaptainTally {
                player_name: "Haaland".to_string(),
                count: 3
            },
            CaptainTally {
                player_name: "Salah".to_string(),
                count: 2
            },
            CaptainTally {
                player_name: "Palmer".to_string(),
                count: 1
            },
        ]
    );
}

#[test]
fn tally_keeps_first_seen_order_on_ties() {
    let tally = tally_captains(["Palmer", "Salah", "Salah", "Palmer"]);
    let names: Vec<&str> = tally.iter().map(|t| t.player_name.as_str()).collect();
    assert_eq!(names, vec!["Palmer", "Salah"]);
    assert!(tally_captains(Vec::<&str>::new()).is_empty());
}

#[test]
fn captain_name_resolves_through_catalog() {
    let mut players = HashMap::new();
    players.insert(328, "M.Salah".to_string());
    let picks = vec![pick(182, false), pick(328, true)];
    assert_eq!(captain_name(&picks, &players), Some("M.Salah"));

    let unknown = vec![pick(999, true)];
    assert_eq!(captain_name(&unknown, &players), None);
    assert_eq!(captain_name(&[pick(328, false)], &players), None);
}

#[test]
fn head_to_head_reads_from_team_perspective() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (1, 50), (2, 45))]);
    matches.insert(2, vec![record(2, (3, 70), (1, 52))]);
    matches.insert(3, vec![record(3, (1, 40), (99, 40))]);
    let rows = vec![row(1, "Uno"), row(2, "Dos"), row(3, "Tres")];

    let results = head_to_head_results(1, &matches, 3, &rows);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].summary(), "Victoria vs Dos (50-45)");
    assert_eq!(results[1].outcome, Outcome::Loss);
    assert_eq!(results[1].summary(), "Derrota vs Tres (52-70)");
    assert_eq!(results[2].opponent_name, UNKNOWN_OPPONENT);
    assert_eq!(results[2].outcome, Outcome::Draw);
}

#[test]
fn head_to_head_skips_gameweeks_without_a_match() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (2, 50), (3, 45))]);
    matches.insert(2, vec![record(2, (1, 60), (2, 45))]);
    let results = head_to_head_results(1, &matches, 2, &[]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].gameweek, 2);
}

#[test]
fn thousands_separator() {
    assert_eq!(format_thousands(0), "0");
    assert_eq!(format_thousands(999), "999");
    assert_eq!(format_thousands(1_000), "1,000");
    assert_eq!(format_thousands(1_234_567), "1,234,567");
    assert_eq!(format_thousands(12_345), "12,345");
}

#[test]
fn detail_pairs_history_and_results_by_position() {
    let profile = EntryProfile {
        id: 1,
        name: "Uno".to_string(),
        player_first_name: "Ana".to_string(),
        player_last_name: "Lopez".to_string(),
        summary_overall_points: Some(180),
    };
    let history = vec![
        history_row(1, 60, 60, Some(1_234_567)),
        history_row(2, 55, 115, Some(0)),
        history_row(3, 65, 180, None),
        history_row(4, 70, 250, Some(10)),
    ];
    let mut matches = MatchesByGameweek::new();
    matches.insert(2, vec![record(2, (1, 55), (2, 50))]);
    let h2h = head_to_head_results(1, &matches, 3, &[row(2, "Dos")]);

    let view = build_team_detail(&profile, &history, &h2h, Vec::new(), TeamStats::default(), 3);
    assert_eq!(view.team_name, "Uno");
    assert_eq!(view.manager_name, "Ana Lopez");
    assert_eq!(view.history.len(), 3);
    // The only result (GW 2) lands on the first history row.
    assert_eq!(view.history[0].h2h.as_ref().map(|r| r.gameweek), Some(2));
    assert!(view.history[1].h2h.is_none());
    assert_eq!(view.history[0].rank_label(), "1,234,567");
    assert_eq!(view.history[1].rank_label(), "-");
    assert_eq!(view.history[2].rank_label(), "-");
}

#[test]
fn head_to_head_handles_extreme_scores() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (2, 1), (1, i32::MIN))]);
    let results = head_to_head_results(1, &matches, 1, &[row(2, "Dos")]);
    assert_eq!(results[0].outcome, Outcome::Loss);
    assert_eq!(results[0].opponent_name, "Dos");
}
