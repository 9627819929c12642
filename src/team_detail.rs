use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::fpl_fetch::{EntryProfile, FplSource, HistoryRow, Pick};
use crate::session::Session;
use crate::standings::StandingRow;
use crate::stats::{MatchesByGameweek, Outcome, TeamStats, compute_team_stats};

pub const UNKNOWN_OPPONENT: &str = "Desconocido";
pub const DETAIL_ERROR_MESSAGE: &str = "Error cargando detalles del equipo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct H2hResult {
    pub gameweek: u32,
    pub own_score: i32,
    pub opponent_score: i32,
    pub opponent_name: String,
    pub outcome: Outcome,
}

impl H2hResult {
    pub fn summary(&self) -> String {
        format!(
            "{} vs {} ({}-{})",
            self.outcome.label(),
            self.opponent_name,
            self.own_score,
            self.opponent_score
        )
    }
}

/// The team's own match per gameweek. Gameweeks where it has no match are skipped, so the
/// result is not indexed by gameweek.
pub fn head_to_head_results(
    team_id: u32,
    matches: &MatchesByGameweek,
    current_gameweek: u32,
    rows: &[StandingRow],
) -> Vec<H2hResult> {
    let mut out = Vec::new();
    for gameweek in 1..=current_gameweek {
        let Some(records) = matches.get(&gameweek) else {
            continue;
        };
        let Some((own, opponent, opponent_id)) =
            records.iter().find_map(|m| m.perspective(team_id))
        else {
            continue;
        };
        let opponent_name = rows
            .iter()
            .find(|r| r.id == opponent_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| UNKNOWN_OPPONENT.to_string());
        out.push(H2hResult {
            gameweek,
            own_score: own,
            opponent_score: opponent,
            opponent_name,
            outcome: Outcome::from_diff(own.saturating_sub(opponent)),
        });
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptainTally {
    pub player_name: String,
    pub count: u32,
}

pub fn captain_name<'a>(picks: &[Pick], players: &'a HashMap<u32, String>) -> Option<&'a str> {
    let captain = picks.iter().find(|p| p.is_captain)?;
    players.get(&captain.element).map(String::as_str)
}

/// Counts per name, most picked first. Equal counts keep first-seen order.
pub fn tally_captains<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<CaptainTally> {
    let mut tally: Vec<CaptainTally> = Vec::new();
    for name in names {
        match tally.iter_mut().find(|t| t.player_name == name) {
            Some(entry) => entry.count += 1,
            None => tally.push(CaptainTally {
                player_name: name.to_string(),
                count: 1,
            }),
        }
    }
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub gameweek: u32,
    pub points: i32,
    pub total_points: i32,
    pub overall_rank: Option<u64>,
    pub h2h: Option<H2hResult>,
}

impl HistoryLine {
    pub fn rank_label(&self) -> String {
        match self.overall_rank {
            Some(rank) if rank > 0 => format_thousands(rank),
            _ => "-".to_string(),
        }
    }
}

pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDetailView {
    pub team_id: u32,
    pub team_name: String,
    pub manager_name: String,
    pub stats: TeamStats,
    pub history: Vec<HistoryLine>,
    pub captains: Vec<CaptainTally>,
}

/// History rows are paired with head-to-head results by position, not by gameweek.
pub fn build_team_detail(
    profile: &EntryProfile,
    history: &[HistoryRow],
    h2h: &[H2hResult],
    captains: Vec<CaptainTally>,
    stats: TeamStats,
    current_gameweek: u32,
) -> TeamDetailView {
    let history = history
        .iter()
        .take(current_gameweek as usize)
        .enumerate()
        .map(|(idx, row)| HistoryLine {
            gameweek: row.event,
            points: row.points,
            total_points: row.total_points,
            overall_rank: row.overall_rank,
            h2h: h2h.get(idx).cloned(),
        })
        .collect();

    TeamDetailView {
        team_id: profile.id,
        team_name: profile.name.clone(),
        manager_name: profile.manager_name(),
        stats,
        history,
        captains,
    }
}

#[derive(Debug)]
pub struct TeamDetailFetch {
    pub view: TeamDetailView,
    /// Gameweeks whose picks could not be fetched.
    pub errors: Vec<String>,
}

/// Profile and history are required; captain picks are fetched one gameweek at a time and a
/// failing gameweek is skipped.
pub fn load_team_detail(
    source: &dyn FplSource,
    session: &Session,
    team_id: u32,
) -> Result<TeamDetailFetch> {
    let profile = source
        .entry(team_id)
        .with_context(|| format!("team {team_id} profile fetch failed"))?;
    let history = source
        .entry_history(team_id)
        .with_context(|| format!("team {team_id} history fetch failed"))?;

    let mut errors = Vec::new();
    let mut names = Vec::new();
    for gameweek in 1..=session.current_gameweek {
        match source.entry_picks(team_id, gameweek) {
            Ok(picks) => {
                if let Some(name) = captain_name(&picks, &session.players) {
                    names.push(name);
                }
            }
            Err(err) => errors.push(format!("captain GW {gameweek} fetch failed: {err:#}")),
        }
    }
    let captains = tally_captains(names);

    let stats = session.stats.get(&team_id).copied().unwrap_or_else(|| {
        compute_team_stats(team_id, &session.matches, session.current_gameweek)
    });
    let h2h = head_to_head_results(
        team_id,
        &session.matches,
        session.current_gameweek,
        &session.rows,
    );

    Ok(TeamDetailFetch {
        view: build_team_detail(
            &profile,
            &history,
            &h2h,
            captains,
            stats,
            session.current_gameweek,
        ),
        errors,
    })
}
