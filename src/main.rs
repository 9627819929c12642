use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use fpl_h2h_terminal::config::AppConfig;
use fpl_h2h_terminal::feed;
use fpl_h2h_terminal::fixtures::{FixtureCard, FixturesView};
use fpl_h2h_terminal::fpl_fetch::HttpSource;
use fpl_h2h_terminal::standings::{SortKey, StandingsLine};
use fpl_h2h_terminal::state::{self, AppState, ProviderCommand, Section, TeamDetailState};
use fpl_h2h_terminal::stats::Outcome;
use fpl_h2h_terminal::team_detail::{DETAIL_ERROR_MESSAGE, TeamDetailView};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn send(&mut self, cmd: ProviderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider unavailable");
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.gameweek_picker.is_some() {
            self.on_picker_key(key);
            return;
        }
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
                self.state.help_overlay = false;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = true,
            KeyCode::Char('1') | KeyCode::Char('b') | KeyCode::Esc => {
                self.state.show_section(Section::Standings)
            }
            KeyCode::Char('2') => self.state.show_section(Section::Fixtures),
            KeyCode::Char('3') | KeyCode::Char('d') | KeyCode::Enter => {
                if self.state.section == Section::Standings || key.code == KeyCode::Char('3') {
                    match self.state.open_selected_team() {
                        Some(cmd) => self.send(cmd),
                        None => self.state.push_log("[INFO] No team selected"),
                    }
                }
            }
            KeyCode::Char('g') => self.state.open_gameweek_picker(),
            KeyCode::Char('r') => {
                let gameweek = self.state.session.as_ref().map(|s| s.current_gameweek);
                let cmd = self.state.begin_load(gameweek);
                self.send(cmd);
            }
            KeyCode::Char('j') | KeyCode::Down => match self.state.section {
                Section::Standings => self.state.select_next(),
                Section::TeamDetails => self.state.scroll_detail_down(),
                Section::Fixtures => self.state.scroll_fixtures_down(),
            },
            KeyCode::Char('k') | KeyCode::Up => match self.state.section {
                Section::Standings => self.state.select_prev(),
                Section::TeamDetails => self.state.scroll_detail_up(),
                Section::Fixtures => self.state.scroll_fixtures_up(),
            },
            KeyCode::Char('l') | KeyCode::Right => match self.state.section {
                Section::Standings => self.state.sort_cursor_next(),
                Section::Fixtures => self.state.fixtures_next(),
                Section::TeamDetails => {}
            },
            KeyCode::Char('h') | KeyCode::Left => match self.state.section {
                Section::Standings => self.state.sort_cursor_prev(),
                Section::Fixtures => self.state.fixtures_prev(),
                Section::TeamDetails => {}
            },
            KeyCode::Char('s') => {
                if self.state.section == Section::Standings {
                    let key = self.state.focused_sort_key();
                    self.state.sort_table(key);
                }
            }
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('g') => self.state.gameweek_picker = None,
            KeyCode::Char('j') | KeyCode::Down => self.state.picker_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.picker_prev(),
            KeyCode::Enter => {
                if let Some(cmd) = self.state.confirm_gameweek() {
                    self.send(cmd);
                }
            }
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let source = Arc::new(HttpSource::new(config.clone()));
    feed::spawn_provider(source, config, tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    let initial = app.state.begin_load(None);
    app.send(initial);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            state::apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[3]);

    if app.state.gameweek_picker.is_some() {
        render_gameweek_picker(frame, area, &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(state: &AppState) -> String {
    let league = state
        .session
        .as_ref()
        .map(|s| s.league_name.clone())
        .unwrap_or_else(|| "...".to_string());
    let gameweek = state
        .session
        .as_ref()
        .map(|s| format!("GW {}/{}", s.current_gameweek, s.season_gameweek))
        .unwrap_or_else(|| "GW -".to_string());
    let line1 = format!(
        "  Fantasy PL - {league} | {gameweek} | Orden: {} {}",
        state.sort.key.header(),
        state.sort.direction.arrow()
    );
    let tab = |section: Section, label: &str| {
        if state.section == section {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    };
    let line2 = format!(
        "  {} {} {}",
        tab(Section::Standings, "1 Clasificación"),
        tab(Section::Fixtures, "2 Partidos"),
        tab(Section::TeamDetails, "3 Equipo"),
    );
    format!("{line1}\n{line2}")
}

fn footer_text(state: &AppState) -> &'static str {
    match state.section {
        Section::Standings => {
            "j/k Move | h/l Column | s Sort | Enter Team | 2 Fixtures | g Gameweek | r Reload | ? Help | q Quit"
        }
        Section::Fixtures => "j/k Scroll | h/l Gameweek | 1 Standings | g Gameweek | ? Help | q Quit",
        Section::TeamDetails => "j/k Scroll | b/Esc Back | 2 Fixtures | ? Help | q Quit",
    }
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(err) = &state.error {
        let text = format!("Error cargando los datos de la liga.\n\n{err}\n\nr Reintentar | q Salir");
        let banner = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Error").borders(Borders::ALL));
        frame.render_widget(banner, area);
        return;
    }
    if state.session.is_none() {
        let msg = if state.loading {
            "Cargando datos de la liga..."
        } else {
            "Sin datos"
        };
        let loading = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(loading, area);
        return;
    }

    match state.section {
        Section::Standings => render_standings(frame, area, state),
        Section::Fixtures => render_fixtures(frame, area, state),
        Section::TeamDetails => render_team_detail(frame, area, state),
    }
}

fn standings_columns() -> [Constraint; 10] {
    [
        Constraint::Length(4),
        Constraint::Min(18),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(6),
    ]
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.standings_view() else {
        return;
    };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = standings_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    for (idx, key) in SortKey::ALL.iter().enumerate() {
        let mut label = key.header().to_string();
        if *key == view.sort.key {
            label.push_str(view.sort.direction.arrow());
        }
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if idx == state.sort_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        render_cell_text(frame, header_cols[idx], &label, style);
    }

    let list_area = sections[1];
    if view.lines.is_empty() {
        let empty = Paragraph::new("No hay equipos en la liga")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, view.lines.len(), visible);
    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == state.selected;
        render_standings_line(frame, row_area, &view.lines[idx], selected, &widths);
    }
}

fn render_standings_line(
    frame: &mut Frame,
    area: Rect,
    line: &StandingsLine,
    selected: bool,
    widths: &[Constraint],
) {
    let base = if selected {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    };
    if selected {
        frame.render_widget(Block::default().style(base), area);
    }
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);

    let row = &line.row;
    let rank_style = if line.highlighted {
        base.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        base
    };
    render_cell_text(frame, cols[0], &row.league_rank.to_string(), rank_style);
    render_cell_text(frame, cols[1], &row.name, base.add_modifier(Modifier::BOLD));
    render_cell_text(frame, cols[2], &row.manager_name, base.fg(Color::Gray));
    render_cell_text(frame, cols[3], &row.h2h_points.to_string(), base.add_modifier(Modifier::BOLD));
    render_cell_text(frame, cols[4], &row.total_points.to_string(), base);
    render_cell_text(frame, cols[5], &row.stats.wins.to_string(), base.fg(Color::Green));
    render_cell_text(frame, cols[6], &row.stats.draws.to_string(), base.fg(Color::Yellow));
    render_cell_text(frame, cols[7], &row.stats.losses.to_string(), base.fg(Color::Red));
    render_cell_text(frame, cols[8], &row.stats.close_wins.to_string(), base);
    render_cell_text(frame, cols[9], &row.stats.close_losses.to_string(), base);
}

fn render_fixtures(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = state.fixtures_view() else {
        return;
    };
    let block = Block::default()
        .title(format!("Jornada {}", view.gameweek()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = match view {
        FixturesView::Empty { message, .. } => {
            let empty = Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, inner);
            return;
        }
        FixturesView::Cards { cards, .. } => cards,
    };

    const CARD_HEIGHT: u16 = 4;
    if inner.height < CARD_HEIGHT {
        return;
    }
    let visible = (inner.height / CARD_HEIGHT) as usize;
    let start = state.fixtures_scroll.min(cards.len().saturating_sub(1));
    for (i, card) in cards.iter().skip(start).take(visible).enumerate() {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + (i as u16) * CARD_HEIGHT,
            width: inner.width,
            height: CARD_HEIGHT,
        };
        render_fixture_card(frame, card_area, card);
    }
}

fn render_fixture_card(frame: &mut Frame, area: Rect, card: &FixtureCard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(outcome_color(card.outcome)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(42),
            Constraint::Percentage(16),
            Constraint::Percentage(42),
        ])
        .split(inner);

    let home = Paragraph::new(format!("{}\n{}", card.home.name, card.home.manager_name))
        .alignment(Alignment::Right);
    let score = Paragraph::new(card.score())
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::BOLD));
    let away = Paragraph::new(format!("{}\n{}", card.away.name, card.away.manager_name))
        .alignment(Alignment::Left);
    frame.render_widget(home, cols[0]);
    frame.render_widget(score, cols[1]);
    frame.render_widget(away, cols[2]);
}

fn render_team_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Equipo").borders(Borders::ALL);
    let text = match &state.team_detail {
        TeamDetailState::Idle => "Selecciona un equipo en la clasificación".to_string(),
        TeamDetailState::Loading { .. } => "Cargando detalles del equipo...".to_string(),
        TeamDetailState::Failed { .. } => DETAIL_ERROR_MESSAGE.to_string(),
        TeamDetailState::Ready(view) => team_detail_text(view),
    };
    let style = if matches!(state.team_detail, TeamDetailState::Failed { .. }) {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let paragraph = Paragraph::new(text)
        .style(style)
        .block(block)
        .scroll((state.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn team_detail_text(view: &TeamDetailView) -> String {
    let s = &view.stats;
    let mut lines = vec![
        view.team_name.clone(),
        format!("Manager: {}", view.manager_name),
        String::new(),
        format!(
            "Victorias {}  Empates {}  Derrotas {}  Victorias ajustadas {}  Derrotas ajustadas {}",
            s.wins, s.draws, s.losses, s.close_wins, s.close_losses
        ),
        String::new(),
        "Resultados por Jornada".to_string(),
        format!(
            "{:<6} {:>12} {:>14} {:>12}  H2H",
            "GW", "Puntos (H2H)", "Puntos Totales", "Ranking"
        ),
    ];
    for line in &view.history {
        let h2h = line.h2h.as_ref().map(|r| r.summary()).unwrap_or_default();
        lines.push(format!(
            "{:<6} {:>12} {:>14} {:>12}  {}",
            format!("GW {}", line.gameweek),
            line.points,
            line.total_points,
            line.rank_label(),
            h2h
        ));
    }
    lines.push(String::new());
    lines.push("Capitanes Elegidos".to_string());
    if view.captains.is_empty() {
        lines.push("-".to_string());
    }
    for captain in &view.captains {
        lines.push(format!("{:<20} {:>3}", captain.player_name, captain.count));
    }
    lines.join("\n")
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Win => Color::Green,
        Outcome::Draw => Color::Yellow,
        Outcome::Loss => Color::Red,
    }
}

fn console_text(state: &AppState) -> String {
    let mut lines: Vec<String> = Vec::new();
    if state.loading {
        lines.push("[INFO] Cargando...".to_string());
    }
    if state.logs.is_empty() && lines.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3 - lines.len());
    lines.extend(state.logs.iter().skip(skip).cloned());
    lines.join("\n")
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_gameweek_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(40, 70, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().title("Gameweek").borders(Borders::ALL);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let options = state.gameweek_options();
    let cursor = state.gameweek_picker.unwrap_or(0);
    let (start, end) = visible_range(cursor, options.len(), inner.height as usize);
    for (i, idx) in (start..end).enumerate() {
        let option = &options[idx];
        let marker = if option.selected { "*" } else { " " };
        let style = if idx == cursor {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let row_area = Rect {
            x: inner.x,
            y: inner.y + i as u16,
            width: inner.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(format!("{marker} {}", option.label)).style(style),
            row_area,
        );
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Fantasy PL H2H - Help",
        "",
        "Global:",
        "  1 / b / Esc  Standings",
        "  2            Fixtures",
        "  3            Selected team",
        "  g            Gameweek selector",
        "  r            Reload",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Standings:",
        "  j/k or ↑/↓   Move",
        "  h/l or ←/→   Column",
        "  s            Sort by column (again to flip)",
        "  Enter / d    Team details",
        "",
        "Fixtures:",
        "  j/k or ↑/↓   Scroll matches",
        "  h/l or ←/→   Previous / next gameweek",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
