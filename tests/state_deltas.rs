use fpl_h2h_terminal::session::Session;
use fpl_h2h_terminal::standings::{SortDirection, SortKey, StandingRow};
use fpl_h2h_terminal::state::{
    AppState, Delta, ProviderCommand, Section, TeamDetailState, apply_delta,
};
use fpl_h2h_terminal::stats::{MatchRecord, MatchesByGameweek, TeamStats};
use fpl_h2h_terminal::team_detail::TeamDetailView;

fn row(id: u32, name: &str, total: i32) -> StandingRow {
    StandingRow {
        id,
        name: name.to_string(),
        manager_name: format!("Manager {id}"),
        league_rank: id,
        h2h_points: 10 - id as i32,
        total_points: total,
        stats: TeamStats::default(),
    }
}

fn session(current: u32) -> Session {
    let mut matches = MatchesByGameweek::new();
    for gw in 1..=current {
        matches.insert(
            gw,
            vec![MatchRecord {
                gameweek: gw,
                team1_id: 1,
                team1_points: 50,
                team2_id: 2,
                team2_points: 40,
            }],
        );
    }
    Session {
        league_id: 854,
        league_name: "Liga".to_string(),
        current_gameweek: current,
        season_gameweek: 5,
        rows: vec![row(1, "Uno", 300), row(2, "Dos", 500), row(3, "Tres", 400)],
        matches,
        ..Session::default()
    }
}

fn loaded_state(current: u32) -> AppState {
    let mut state = AppState::new();
    let ProviderCommand::LoadSession { generation, .. } = state.begin_load(None) else {
        panic!("expected load command");
    };
    apply_delta(
        &mut state,
        Delta::SessionLoaded {
            generation,
            session: session(current),
        },
    );
    state
}

fn detail_view(team_id: u32) -> TeamDetailView {
    TeamDetailView {
        team_id,
        team_name: "Uno".to_string(),
        manager_name: String::new(),
        stats: TeamStats::default(),
        history: Vec::new(),
        captains: Vec::new(),
    }
}

#[test]
fn begin_load_sets_loading_and_clears_error() {
    let mut state = AppState::new();
    state.error = Some("boom".to_string());
    let cmd = state.begin_load(Some(3));
    assert!(state.loading);
    assert!(state.error.is_none());
    assert!(matches!(
        cmd,
        ProviderCommand::LoadSession {
            gameweek: Some(3),
            ..
        }
    ));
}

#[test]
fn session_loaded_populates_state_and_logs() {
    let state = loaded_state(4);
    assert!(!state.loading);
    assert_eq!(state.row_count(), 3);
    assert_eq!(state.fixtures_gameweek, 4);
    assert_eq!(
        state.logs.back().map(String::as_str),
        Some("[INFO] Liga: 3 teams, GW 1-4")
    );
}

#[test]
fn stale_generation_is_ignored() {
    let mut state = AppState::new();
    let ProviderCommand::LoadSession {
        generation: first, ..
    } = state.begin_load(None)
    else {
        panic!("expected load command");
    };
    let _second = state.begin_load(None);

    apply_delta(
        &mut state,
        Delta::SessionLoaded {
            generation: first,
            session: session(2),
        },
    );
    assert!(state.session.is_none());
    assert!(state.loading);

    apply_delta(
        &mut state,
        Delta::LoadFailed {
            generation: first,
            message: "late".to_string(),
        },
    );
    assert!(state.error.is_none());
}

#[test]
fn load_failure_sets_error_and_clears_session() {
    let mut state = loaded_state(2);
    let ProviderCommand::LoadSession { generation, .. } = state.begin_load(None) else {
        panic!("expected load command");
    };
    apply_delta(
        &mut state,
        Delta::LoadFailed {
            generation,
            message: "league standings fetch failed".to_string(),
        },
    );
    assert!(!state.loading);
    assert!(state.session.is_none());
    assert_eq!(
        state.error.as_deref(),
        Some("league standings fetch failed")
    );
    assert!(
        state
            .logs
            .back()
            .is_some_and(|l| l.starts_with("[WARN] Load failed"))
    );
}

#[test]
fn fixtures_section_resets_to_current_gameweek() {
    let mut state = loaded_state(3);
    state.show_section(Section::Fixtures);
    state.fixtures_prev();
    state.fixtures_prev();
    state.fixtures_prev();
    assert_eq!(state.fixtures_gameweek, 1);
    state.fixtures_next();
    assert_eq!(state.fixtures_gameweek, 2);
    state.fixtures_next();
    state.fixtures_next();
    assert_eq!(state.fixtures_gameweek, 3);

    state.show_section(Section::Standings);
    state.fixtures_prev();
    state.show_section(Section::Fixtures);
    assert_eq!(state.fixtures_gameweek, 3);
    assert_eq!(state.fixtures_view().map(|v| v.gameweek()), Some(3));
}

#[test]
fn selection_wraps_around() {
    let mut state = loaded_state(1);
    state.select_prev();
    assert_eq!(state.selected, 2);
    state.select_next();
    assert_eq!(state.selected, 0);
}

#[test]
fn sort_keeps_selected_team() {
    let mut state = loaded_state(1);
    state.select_next();
    assert_eq!(state.selected_team_id(), Some(2));

    state.sort_table(SortKey::TotalPoints);
    assert_eq!(state.sort.direction, SortDirection::Asc);
    assert_eq!(state.selected_team_id(), Some(2));
    assert_eq!(state.selected, 2);

    state.sort_table(SortKey::TotalPoints);
    assert_eq!(state.sort.direction, SortDirection::Desc);
    assert_eq!(state.selected, 0);
}

#[test]
fn sort_cursor_cycles_columns() {
    let mut state = AppState::new();
    assert_eq!(state.focused_sort_key(), SortKey::Rank);
    state.sort_cursor_prev();
    assert_eq!(state.focused_sort_key(), SortKey::CloseLosses);
    state.sort_cursor_next();
    state.sort_cursor_next();
    assert_eq!(state.focused_sort_key(), SortKey::Name);
}

#[test]
fn picker_confirm_reloads_bounded_gameweek() {
    let mut state = loaded_state(3);
    state.open_gameweek_picker();
    assert_eq!(state.gameweek_picker, Some(2));
    state.picker_prev();
    let cmd = state.confirm_gameweek().expect("picker was open");
    assert!(matches!(
        cmd,
        ProviderCommand::LoadSession {
            gameweek: Some(2),
            ..
        }
    ));
    assert!(state.gameweek_picker.is_none());
    assert!(state.loading);
    assert!(state.confirm_gameweek().is_none());
}

#[test]
fn picker_stops_at_last_gameweek() {
    let mut state = loaded_state(5);
    state.open_gameweek_picker();
    state.picker_next();
    state.picker_next();
    assert_eq!(state.gameweek_picker, Some(4));
}

#[test]
fn team_detail_without_session_is_refused() {
    let mut state = AppState::new();
    assert!(state.open_team_detail(1).is_none());
    assert_eq!(state.section, Section::Standings);
}

#[test]
fn stale_team_detail_response_is_ignored() {
    let mut state = loaded_state(2);
    let Some(ProviderCommand::FetchTeamDetail { request: first, .. }) = state.open_team_detail(1)
    else {
        panic!("expected detail command");
    };
    let Some(ProviderCommand::FetchTeamDetail {
        request: second, ..
    }) = state.open_team_detail(2)
    else {
        panic!("expected detail command");
    };

    apply_delta(
        &mut state,
        Delta::TeamDetailLoaded {
            request: first,
            view: detail_view(1),
        },
    );
    assert_eq!(state.team_detail, TeamDetailState::Loading { team_id: 2 });

    apply_delta(
        &mut state,
        Delta::TeamDetailFailed {
            request: second,
            team_id: 2,
            message: "team 2 profile fetch failed".to_string(),
        },
    );
    assert!(matches!(
        state.team_detail,
        TeamDetailState::Failed { team_id: 2, .. }
    ));
    assert_eq!(state.section, Section::TeamDetails);
}

#[test]
fn reload_leaves_team_details_section() {
    let mut state = loaded_state(2);
    let _ = state.open_team_detail(1);
    assert_eq!(state.section, Section::TeamDetails);
    let ProviderCommand::LoadSession { generation, .. } = state.begin_load(None) else {
        panic!("expected load command");
    };
    apply_delta(
        &mut state,
        Delta::SessionLoaded {
            generation,
            session: session(2),
        },
    );
    assert_eq!(state.section, Section::Standings);
    assert_eq!(state.team_detail, TeamDetailState::Idle);
}

#[test]
fn log_buffer_is_bounded() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
}

fn crowded_state() -> AppState {
    let mut state = AppState::new();
    let ProviderCommand::LoadSession { generation, .. } = state.begin_load(None) else {
        panic!("expected load command");
    };
    let mut crowded = session(2);
    for gw in 1..=2 {
        let records = (0..10)
            .map(|pair| MatchRecord {
                gameweek: gw,
                team1_id: 100 + pair * 2,
                team1_points: 50,
                team2_id: 101 + pair * 2,
                team2_points: 45,
            })
            .collect();
        crowded.matches.insert(gw, records);
    }
    apply_delta(
        &mut state,
        Delta::SessionLoaded {
            generation,
            session: crowded,
        },
    );
    state
}

#[test]
fn fixture_scroll_reaches_every_card() {
    let mut state = crowded_state();
    state.show_section(Section::Fixtures);
    state.scroll_fixtures_up();
    assert_eq!(state.fixtures_scroll, 0);
    for _ in 0..20 {
        state.scroll_fixtures_down();
    }
    assert_eq!(state.fixtures_scroll, 9);
    state.scroll_fixtures_up();
    assert_eq!(state.fixtures_scroll, 8);
}

#[test]
fn fixture_scroll_resets_on_navigation_and_reload() {
    let mut state = crowded_state();
    state.show_section(Section::Fixtures);
    state.scroll_fixtures_down();
    state.fixtures_prev();
    assert_eq!(state.fixtures_gameweek, 1);
    assert_eq!(state.fixtures_scroll, 0);

    state.scroll_fixtures_down();
    state.fixtures_next();
    assert_eq!(state.fixtures_scroll, 0);

    state.scroll_fixtures_down();
    state.show_section(Section::Standings);
    state.show_section(Section::Fixtures);
    assert_eq!(state.fixtures_scroll, 0);

    state.scroll_fixtures_down();
    let ProviderCommand::LoadSession { generation, .. } = state.begin_load(None) else {
        panic!("expected load command");
    };
    apply_delta(
        &mut state,
        Delta::SessionLoaded {
            generation,
            session: session(2),
        },
    );
    assert_eq!(state.fixtures_scroll, 0);
}

#[test]
fn fixture_scroll_stays_put_on_empty_gameweek() {
    let mut state = loaded_state(2);
    state.show_section(Section::Fixtures);
    state.fixtures_gameweek = 7;
    state.scroll_fixtures_down();
    assert_eq!(state.fixtures_scroll, 0);
}
