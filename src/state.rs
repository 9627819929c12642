use std::collections::VecDeque;
use std::sync::Arc;

use crate::fixtures::{FixturesView, render_fixtures};
use crate::session::{GameweekOption, Session};
use crate::standings::{SortConfig, SortKey, StandingsView, render_standings};
use crate::team_detail::TeamDetailView;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Standings,
    Fixtures,
    TeamDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamDetailState {
    Idle,
    Loading { team_id: u32 },
    Ready(TeamDetailView),
    Failed { team_id: u32, message: String },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub section: Section,
    pub session: Option<Arc<Session>>,
    pub loading: bool,
    pub error: Option<String>,
    pub sort: SortConfig,
    /// Column under the header cursor; `s` sorts by it.
    pub sort_cursor: usize,
    pub selected: usize,
    pub fixtures_gameweek: u32,
    /// First fixture card drawn in the Fixtures section.
    pub fixtures_scroll: usize,
    pub team_detail: TeamDetailState,
    pub detail_scroll: u16,
    /// Cursor inside the gameweek selector overlay, `None` when closed.
    pub gameweek_picker: Option<usize>,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
    load_generation: u64,
    detail_request: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            section: Section::Standings,
            session: None,
            loading: false,
            error: None,
            sort: SortConfig::default(),
            sort_cursor: 0,
            selected: 0,
            fixtures_gameweek: 1,
            fixtures_scroll: 0,
            team_detail: TeamDetailState::Idle,
            detail_scroll: 0,
            gameweek_picker: None,
            help_overlay: false,
            logs: VecDeque::new(),
            load_generation: 0,
            detail_request: 0,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Starts a new load cycle; responses of older cycles are dropped on arrival.
    pub fn begin_load(&mut self, gameweek: Option<u32>) -> ProviderCommand {
        self.load_generation += 1;
        self.loading = true;
        self.error = None;
        self.gameweek_picker = None;
        ProviderCommand::LoadSession {
            generation: self.load_generation,
            gameweek,
        }
    }

    pub fn show_section(&mut self, section: Section) {
        if section == Section::Fixtures
            && let Some(session) = &self.session
        {
            self.fixtures_gameweek = session.current_gameweek;
        }
        self.fixtures_scroll = 0;
        self.section = section;
    }

    /// Switches to the detail section and returns the fetch to issue, if data is loaded.
    pub fn open_team_detail(&mut self, team_id: u32) -> Option<ProviderCommand> {
        let session = self.session.clone()?;
        self.detail_request += 1;
        self.detail_scroll = 0;
        self.team_detail = TeamDetailState::Loading { team_id };
        self.show_section(Section::TeamDetails);
        Some(ProviderCommand::FetchTeamDetail {
            request: self.detail_request,
            team_id,
            session,
        })
    }

    pub fn open_selected_team(&mut self) -> Option<ProviderCommand> {
        let team_id = self.selected_team_id()?;
        self.open_team_detail(team_id)
    }

    pub fn standings_view(&self) -> Option<StandingsView> {
        let session = self.session.as_ref()?;
        Some(render_standings(&session.rows, &self.sort))
    }

    pub fn fixtures_view(&self) -> Option<FixturesView> {
        let session = self.session.as_ref()?;
        Some(render_fixtures(
            self.fixtures_gameweek,
            &session.matches,
            &session.rows,
        ))
    }

    pub fn selected_team_id(&self) -> Option<u32> {
        let view = self.standings_view()?;
        view.lines.get(self.selected).map(|line| line.row.id)
    }

    pub fn row_count(&self) -> usize {
        self.session.as_ref().map(|s| s.rows.len()).unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.row_count();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn sort_cursor_next(&mut self) {
        self.sort_cursor = (self.sort_cursor + 1) % SortKey::ALL.len();
    }

    pub fn sort_cursor_prev(&mut self) {
        self.sort_cursor = self
            .sort_cursor
            .checked_sub(1)
            .unwrap_or(SortKey::ALL.len() - 1);
    }

    pub fn focused_sort_key(&self) -> SortKey {
        SortKey::ALL[self.sort_cursor % SortKey::ALL.len()]
    }

    /// Header click on `key`; the selection stays on the same team.
    pub fn sort_table(&mut self, key: SortKey) {
        let selected_id = self.selected_team_id();
        self.sort.sort_table(key);
        if let Some(id) = selected_id
            && let Some(view) = self.standings_view()
            && let Some(pos) = view.lines.iter().position(|l| l.row.id == id)
        {
            self.selected = pos;
        }
    }

    pub fn fixtures_next(&mut self) {
        if let Some(session) = &self.session
            && self.fixtures_gameweek < session.current_gameweek
        {
            self.fixtures_gameweek += 1;
            self.fixtures_scroll = 0;
        }
    }

    pub fn fixtures_prev(&mut self) {
        if self.fixtures_gameweek > 1 {
            self.fixtures_gameweek -= 1;
            self.fixtures_scroll = 0;
        }
    }

    fn fixture_count(&self) -> usize {
        match self.fixtures_view() {
            Some(FixturesView::Cards { cards, .. }) => cards.len(),
            _ => 0,
        }
    }

    /// Stops on the last card so at least one stays visible.
    pub fn scroll_fixtures_down(&mut self) {
        let last = self.fixture_count().saturating_sub(1);
        self.fixtures_scroll = (self.fixtures_scroll + 1).min(last);
    }

    pub fn scroll_fixtures_up(&mut self) {
        self.fixtures_scroll = self.fixtures_scroll.saturating_sub(1);
    }

    pub fn gameweek_options(&self) -> Vec<GameweekOption> {
        self.session
            .as_ref()
            .map(|s| s.gameweek_options())
            .unwrap_or_default()
    }

    pub fn open_gameweek_picker(&mut self) {
        let options = self.gameweek_options();
        if options.is_empty() {
            return;
        }
        let pos = options.iter().position(|o| o.selected).unwrap_or(0);
        self.gameweek_picker = Some(pos);
    }

    pub fn picker_next(&mut self) {
        let total = self.gameweek_options().len();
        if let Some(pos) = self.gameweek_picker.as_mut()
            && total > 0
        {
            *pos = (*pos + 1).min(total - 1);
        }
    }

    pub fn picker_prev(&mut self) {
        if let Some(pos) = self.gameweek_picker.as_mut() {
            *pos = pos.saturating_sub(1);
        }
    }

    /// Confirms the highlighted gameweek and starts a reload bounded by it.
    pub fn confirm_gameweek(&mut self) -> Option<ProviderCommand> {
        let pos = self.gameweek_picker.take()?;
        let option = self.gameweek_options().into_iter().nth(pos)?;
        Some(self.begin_load(Some(option.gameweek)))
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SessionLoaded { generation: u64, session: Session },
    LoadFailed { generation: u64, message: String },
    TeamDetailLoaded { request: u64, view: TeamDetailView },
    TeamDetailFailed { request: u64, team_id: u32, message: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    LoadSession {
        generation: u64,
        gameweek: Option<u32>,
    },
    FetchTeamDetail {
        request: u64,
        team_id: u32,
        session: Arc<Session>,
    },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SessionLoaded {
            generation,
            session,
        } => {
            if generation != state.load_generation {
                return;
            }
            state.loading = false;
            state.error = None;
            state.fixtures_gameweek = session.current_gameweek;
            state.fixtures_scroll = 0;
            state.push_log(format!(
                "[INFO] {}: {} teams, GW 1-{}",
                session.league_name,
                session.rows.len(),
                session.current_gameweek
            ));
            state.session = Some(Arc::new(session));
            state.clamp_selection();
            if state.section == Section::TeamDetails {
                state.team_detail = TeamDetailState::Idle;
                state.section = Section::Standings;
            }
        }
        Delta::LoadFailed {
            generation,
            message,
        } => {
            if generation != state.load_generation {
                return;
            }
            state.loading = false;
            state.session = None;
            state.selected = 0;
            state.push_log(format!("[WARN] Load failed: {message}"));
            state.error = Some(message);
        }
        Delta::TeamDetailLoaded { request, view } => {
            if request != state.detail_request {
                return;
            }
            state.team_detail = TeamDetailState::Ready(view);
        }
        Delta::TeamDetailFailed {
            request,
            team_id,
            message,
        } => {
            if request != state.detail_request {
                return;
            }
            state.push_log(format!("[WARN] Team {team_id} details failed: {message}"));
            state.team_detail = TeamDetailState::Failed { team_id, message };
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
