use fpl_h2h_terminal::fixtures::{
    AWAY_PLACEHOLDER, EMPTY_FIXTURES_MESSAGE, FixturesView, HOME_PLACEHOLDER, render_fixtures,
};
use fpl_h2h_terminal::standings::StandingRow;
use fpl_h2h_terminal::stats::{MatchRecord, MatchesByGameweek, Outcome, TeamStats};

fn row(id: u32, name: &str, manager: &str) -> StandingRow {
    StandingRow {
        id,
        name: name.to_string(),
        manager_name: manager.to_string(),
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

fn rows() -> Vec<StandingRow> {
    vec![
        row(101, "Los Galacticos", "Ana Lopez"),
        row(102, "Atletico Sofa", "Bruno Diaz"),
        row(103, "Real Siesta", "Carla Ruiz"),
    ]
}

#[test]
fn missing_gameweek_renders_empty_state() {
    let view = render_fixtures(4, &MatchesByGameweek::new(), &rows());
    assert_eq!(
        view,
        FixturesView::Empty {
            gameweek: 4,
            message: EMPTY_FIXTURES_MESSAGE.to_string(),
        }
    );
    assert_eq!(view.gameweek(), 4);
}

#[test]
fn empty_gameweek_list_renders_empty_state() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(2, Vec::new());
    let view = render_fixtures(2, &matches, &rows());
    assert!(matches!(view, FixturesView::Empty { .. }));
}

#[test]
fn cards_resolve_names_and_score() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(
        3,
        vec![record(3, (101, 60), (102, 58)), record(3, (103, 40), (101, 40))],
    );
    let FixturesView::Cards { gameweek, cards } = render_fixtures(3, &matches, &rows()) else {
        panic!("expected cards");
    };
    assert_eq!(gameweek, 3);
    assert_eq!(cards.len(), 2);

    assert_eq!(cards[0].home.name, "Los Galacticos");
    assert_eq!(cards[0].home.manager_name, "Ana Lopez");
    assert_eq!(cards[0].away.name, "Atletico Sofa");
    assert_eq!(cards[0].score(), "60 - 58");
    assert_eq!(cards[0].outcome, Outcome::Win);

    assert_eq!(cards[1].outcome, Outcome::Draw);
    assert_eq!(cards[1].score(), "40 - 40");
}

#[test]
fn outcome_is_taken_from_first_entry() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (102, 30), (101, 71))]);
    let FixturesView::Cards { cards, .. } = render_fixtures(1, &matches, &rows()) else {
        panic!("expected cards");
    };
    assert_eq!(cards[0].outcome, Outcome::Loss);
}

#[test]
fn unknown_teams_use_placeholders() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (900, 55), (901, 44))]);
    let FixturesView::Cards { cards, .. } = render_fixtures(1, &matches, &rows()) else {
        panic!("expected cards");
    };
    assert_eq!(cards[0].home.name, HOME_PLACEHOLDER);
    assert_eq!(cards[0].away.name, AWAY_PLACEHOLDER);
    assert!(cards[0].home.manager_name.is_empty());
    assert_eq!(cards[0].score(), "55 - 44");
}

#[test]
fn other_gameweeks_do_not_leak_into_view() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (101, 50), (102, 40))]);
    matches.insert(2, vec![record(2, (103, 50), (102, 40))]);
    let FixturesView::Cards { cards, .. } = render_fixtures(2, &matches, &rows()) else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].home.team_id, 103);
}

#[test]
fn extreme_scores_still_render() {
    let mut matches = MatchesByGameweek::new();
    matches.insert(1, vec![record(1, (101, i32::MIN), (102, 1))]);
    let FixturesView::Cards { cards, .. } = render_fixtures(1, &matches, &rows()) else {
        panic!("expected cards");
    };
    assert_eq!(cards[0].outcome, Outcome::Loss);
}
