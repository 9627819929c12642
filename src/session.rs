use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::fpl_fetch::{EntryProfile, FplSource};
use crate::standings::{StandingRow, build_standings};
use crate::stats::{MatchesByGameweek, TeamStats, compute_all_stats};

/// Everything one load cycle produced. Rebuilt from scratch on every load.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub league_id: u32,
    pub league_name: String,
    /// Upper bound for stats and fixtures, picked in the gameweek selector.
    pub current_gameweek: u32,
    /// Latest gameweek of the season according to the API.
    pub season_gameweek: u32,
    pub rows: Vec<StandingRow>,
    pub matches: MatchesByGameweek,
    pub stats: HashMap<u32, TeamStats>,
    pub players: HashMap<u32, String>,
    pub deadlines: HashMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameweekOption {
    pub gameweek: u32,
    pub label: String,
    pub selected: bool,
}

impl Session {
    pub fn row(&self, team_id: u32) -> Option<&StandingRow> {
        self.rows.iter().find(|r| r.id == team_id)
    }

    /// One option per gameweek of the season; the latest is tagged, the loaded one selected.
    pub fn gameweek_options(&self) -> Vec<GameweekOption> {
        (1..=self.season_gameweek)
            .map(|gameweek| {
                let mut label = format!("Gameweek {gameweek}");
                if gameweek == self.season_gameweek {
                    label.push_str(" (Actual)");
                }
                if let Some(deadline) = self.deadlines.get(&gameweek).and_then(|d| format_deadline(d)) {
                    label.push_str(&format!("  {deadline}"));
                }
                GameweekOption {
                    gameweek,
                    label,
                    selected: gameweek == self.current_gameweek,
                }
            })
            .collect()
    }
}

fn format_deadline(raw: &str) -> Option<String> {
    let dt = DateTime::parse_from_rfc3339(raw.trim()).ok()?;
    Some(dt.with_timezone(&Utc).format("%d/%m %H:%M UTC").to_string())
}

#[derive(Debug)]
pub struct SessionLoad {
    pub session: Session,
    /// Isolated failures (dropped teams); the load itself succeeded.
    pub errors: Vec<String>,
}

/// Full load cycle. Season metadata, league standings and every gameweek's matches must
/// succeed; a failed team profile only drops that team.
pub fn load_session(
    source: &dyn FplSource,
    league_id: u32,
    parallelism: usize,
    requested_gameweek: Option<u32>,
) -> Result<SessionLoad> {
    let bootstrap = source.bootstrap().context("season metadata fetch failed")?;
    let season_gameweek = bootstrap.current_gameweek();
    let current_gameweek = requested_gameweek
        .map(|gw| gw.clamp(1, season_gameweek))
        .unwrap_or(season_gameweek);

    let league = source
        .league_standings(league_id)
        .context("league standings fetch failed")?;
    let team_ids: Vec<u32> = league.entries.iter().map(|e| e.entry).collect();

    let gameweeks: Vec<u32> = (1..=current_gameweek).collect();
    let fetched: Vec<(u32, Vec<_>)> = with_fetch_pool(parallelism, || {
        gameweeks
            .par_iter()
            .map(|gw| source.h2h_matches(league_id, *gw).map(|records| (*gw, records)))
            .collect::<Result<Vec<_>>>()
    })
    .context("match data fetch failed")?;
    let matches: MatchesByGameweek = fetched.into_iter().collect();

    let stats = compute_all_stats(&team_ids, &matches, current_gameweek);

    let results: Vec<(u32, Result<EntryProfile>)> = with_fetch_pool(parallelism, || {
        team_ids
            .par_iter()
            .map(|id| (*id, source.entry(*id)))
            .collect()
    });

    let mut errors = Vec::new();
    let mut profiles = HashMap::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(profile) => {
                profiles.insert(id, profile);
            }
            Err(err) => errors.push(format!("team {id} fetch failed: {err:#}")),
        }
    }

    let rows = build_standings(&league.entries, &profiles, &stats);
    let deadlines = bootstrap
        .events
        .iter()
        .filter_map(|e| e.deadline_time.clone().map(|d| (e.id, d)))
        .collect();

    Ok(SessionLoad {
        session: Session {
            league_id,
            league_name: league.name,
            current_gameweek,
            season_gameweek,
            rows,
            matches,
            stats,
            players: bootstrap.player_catalog(),
            deadlines,
        },
        errors,
    })
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}
