use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::http_cache::fetch_json;
use crate::http_client::http_client;
use crate::stats::MatchRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameweekEvent {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub deadline_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerElement {
    pub id: u32,
    pub web_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub events: Vec<GameweekEvent>,
    #[serde(default)]
    pub elements: Vec<PlayerElement>,
}

impl Bootstrap {
    /// Gameweek flagged `is_current`, or 1 before the season starts.
    pub fn current_gameweek(&self) -> u32 {
        self.events
            .iter()
            .find(|e| e.is_current)
            .map(|e| e.id)
            .filter(|id| *id > 0)
            .unwrap_or(1)
    }

    pub fn player_catalog(&self) -> HashMap<u32, String> {
        self.elements
            .iter()
            .map(|p| (p.id, p.web_name.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueEntry {
    pub entry: u32,
    #[serde(default)]
    pub entry_name: String,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueStandings {
    pub league_id: u32,
    pub name: String,
    pub entries: Vec<LeagueEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryProfile {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub player_first_name: String,
    #[serde(default)]
    pub player_last_name: String,
    #[serde(default)]
    pub summary_overall_points: Option<i32>,
}

impl EntryProfile {
    pub fn manager_name(&self) -> String {
        format!("{} {}", self.player_first_name, self.player_last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub event: u32,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub total_points: i32,
    #[serde(default)]
    pub overall_rank: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub element: u32,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
    #[serde(default)]
    pub multiplier: u32,
}

/// Retrieval seam for the FPL resources the dashboard consumes.
pub trait FplSource: Send + Sync {
    fn bootstrap(&self) -> Result<Bootstrap>;
    fn league_standings(&self, league_id: u32) -> Result<LeagueStandings>;
    fn h2h_matches(&self, league_id: u32, gameweek: u32) -> Result<Vec<MatchRecord>>;
    fn entry(&self, team_id: u32) -> Result<EntryProfile>;
    fn entry_history(&self, team_id: u32) -> Result<Vec<HistoryRow>>;
    fn entry_picks(&self, team_id: u32, gameweek: u32) -> Result<Vec<Pick>>;
}

pub struct HttpSource {
    config: AppConfig,
}

impl HttpSource {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn get(&self, url: &str) -> Result<String> {
        let client = http_client(self.config.http_timeout)?;
        fetch_json(client, url, self.config.http_cache)
    }
}

impl FplSource for HttpSource {
    fn bootstrap(&self) -> Result<Bootstrap> {
        let body = self
            .get(&bootstrap_url(&self.config.api_base))
            .context("bootstrap request failed")?;
        parse_bootstrap_json(&body)
    }

    fn league_standings(&self, league_id: u32) -> Result<LeagueStandings> {
        let body = self
            .get(&league_standings_url(&self.config.api_base, league_id))
            .context("league standings request failed")?;
        parse_league_standings_json(&body, league_id)
    }

    fn h2h_matches(&self, league_id: u32, gameweek: u32) -> Result<Vec<MatchRecord>> {
        let body = self
            .get(&h2h_matches_url(&self.config.api_base, league_id, gameweek))
            .with_context(|| format!("gameweek {gameweek} matches request failed"))?;
        parse_h2h_matches_json(&body, gameweek)
    }

    fn entry(&self, team_id: u32) -> Result<EntryProfile> {
        let body = self
            .get(&entry_url(&self.config.api_base, team_id))
            .with_context(|| format!("entry {team_id} request failed"))?;
        parse_entry_json(&body)
    }

    fn entry_history(&self, team_id: u32) -> Result<Vec<HistoryRow>> {
        let body = self
            .get(&entry_history_url(&self.config.api_base, team_id))
            .with_context(|| format!("entry {team_id} history request failed"))?;
        parse_entry_history_json(&body)
    }

    fn entry_picks(&self, team_id: u32, gameweek: u32) -> Result<Vec<Pick>> {
        let body = self
            .get(&entry_picks_url(&self.config.api_base, team_id, gameweek))
            .with_context(|| format!("entry {team_id} picks GW {gameweek} request failed"))?;
        parse_entry_picks_json(&body)
    }
}

pub fn bootstrap_url(base: &str) -> String {
    format!("{base}/bootstrap-static/")
}

pub fn league_standings_url(base: &str, league_id: u32) -> String {
    format!("{base}/leagues-h2h/{league_id}/standings/")
}

/// Only page 1 is requested; a league's gameweek fits on it.
pub fn h2h_matches_url(base: &str, league_id: u32, gameweek: u32) -> String {
    format!("{base}/leagues-h2h-matches/league/{league_id}/?page=1&event={gameweek}")
}

pub fn entry_url(base: &str, team_id: u32) -> String {
    format!("{base}/entry/{team_id}/")
}

pub fn entry_history_url(base: &str, team_id: u32) -> String {
    format!("{base}/entry/{team_id}/history/")
}

pub fn entry_picks_url(base: &str, team_id: u32, gameweek: u32) -> String {
    format!("{base}/entry/{team_id}/event/{gameweek}/picks/")
}

pub fn parse_bootstrap_json(raw: &str) -> Result<Bootstrap> {
    let trimmed = non_null(raw).context("empty bootstrap response")?;
    serde_json::from_str(trimmed).context("invalid bootstrap json")
}

#[derive(Debug, Deserialize)]
struct LeagueStandingsResponse {
    #[serde(default)]
    league: Option<LeagueInfo>,
    #[serde(default)]
    standings: Option<StandingsPage>,
}

#[derive(Debug, Deserialize)]
struct LeagueInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StandingsPage {
    #[serde(default)]
    results: Vec<LeagueEntry>,
}

pub fn parse_league_standings_json(raw: &str, league_id: u32) -> Result<LeagueStandings> {
    let trimmed = non_null(raw).context("empty league standings response")?;
    let resp: LeagueStandingsResponse =
        serde_json::from_str(trimmed).context("invalid league standings json")?;
    let name = resp
        .league
        .and_then(|l| l.name)
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("Liga {league_id}"));
    let entries = resp.standings.map(|s| s.results).unwrap_or_default();
    Ok(LeagueStandings {
        league_id,
        name,
        entries,
    })
}

#[derive(Debug, Deserialize)]
struct H2hMatchesResponse {
    #[serde(default)]
    results: Vec<H2hMatch>,
}

#[derive(Debug, Deserialize)]
struct H2hMatch {
    #[serde(default)]
    entry_1_entry: Option<u32>,
    #[serde(default)]
    entry_1_points: Option<i32>,
    #[serde(default)]
    entry_2_entry: Option<u32>,
    #[serde(default)]
    entry_2_points: Option<i32>,
}

/// Records with a missing side (byes) are dropped, every returned record names two teams.
pub fn parse_h2h_matches_json(raw: &str, gameweek: u32) -> Result<Vec<MatchRecord>> {
    let Some(trimmed) = non_null(raw) else {
        return Ok(Vec::new());
    };
    let resp: H2hMatchesResponse =
        serde_json::from_str(trimmed).context("invalid h2h matches json")?;
    Ok(resp
        .results
        .into_iter()
        .filter_map(|m| {
            Some(MatchRecord {
                gameweek,
                team1_id: m.entry_1_entry?,
                team1_points: m.entry_1_points.unwrap_or(0),
                team2_id: m.entry_2_entry?,
                team2_points: m.entry_2_points.unwrap_or(0),
            })
        })
        .collect())
}

pub fn parse_entry_json(raw: &str) -> Result<EntryProfile> {
    let trimmed = non_null(raw).context("empty entry response")?;
    serde_json::from_str(trimmed).context("invalid entry json")
}

#[derive(Debug, Deserialize)]
struct EntryHistoryResponse {
    #[serde(default)]
    current: Vec<HistoryRow>,
}

pub fn parse_entry_history_json(raw: &str) -> Result<Vec<HistoryRow>> {
    let trimmed = non_null(raw).context("empty entry history response")?;
    let resp: EntryHistoryResponse =
        serde_json::from_str(trimmed).context("invalid entry history json")?;
    Ok(resp.current)
}

#[derive(Debug, Deserialize)]
struct EntryPicksResponse {
    #[serde(default)]
    picks: Vec<Pick>,
}

pub fn parse_entry_picks_json(raw: &str) -> Result<Vec<Pick>> {
    let trimmed = non_null(raw).context("empty picks response")?;
    let resp: EntryPicksResponse =
        serde_json::from_str(trimmed).context("invalid picks json")?;
    Ok(resp.picks)
}

fn non_null(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        Some(trimmed)
    }
}
