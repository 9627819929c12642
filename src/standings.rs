use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::fpl_fetch::{EntryProfile, LeagueEntry};
use crate::stats::TeamStats;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingRow {
    pub id: u32,
    pub name: String,
    pub manager_name: String,
    pub league_rank: u32,
    pub h2h_points: i32,
    pub total_points: i32,
    pub stats: TeamStats,
}

/// One row per league entry that has a profile, in league order.
pub fn build_standings(
    league_entries: &[LeagueEntry],
    profiles: &HashMap<u32, EntryProfile>,
    stats: &HashMap<u32, TeamStats>,
) -> Vec<StandingRow> {
    league_entries
        .iter()
        .filter_map(|entry| {
            let profile = profiles.get(&entry.entry)?;
            Some(StandingRow {
                id: entry.entry,
                name: profile.name.clone(),
                manager_name: profile.manager_name(),
                league_rank: entry.rank,
                h2h_points: entry.total,
                total_points: profile.summary_overall_points.unwrap_or(0),
                stats: stats.get(&entry.entry).copied().unwrap_or_default(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Rank,
    Name,
    Manager,
    H2hPoints,
    TotalPoints,
    Wins,
    Draws,
    Losses,
    CloseWins,
    CloseLosses,
}

impl SortKey {
    /// Column order of the standings table.
    pub const ALL: [SortKey; 10] = [
        SortKey::Rank,
        SortKey::Name,
        SortKey::Manager,
        SortKey::H2hPoints,
        SortKey::TotalPoints,
        SortKey::Wins,
        SortKey::Draws,
        SortKey::Losses,
        SortKey::CloseWins,
        SortKey::CloseLosses,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SortKey::Rank => "#",
            SortKey::Name => "Equipo",
            SortKey::Manager => "Manager",
            SortKey::H2hPoints => "Pts H2H",
            SortKey::TotalPoints => "Pts Totales",
            SortKey::Wins => "V",
            SortKey::Draws => "E",
            SortKey::Losses => "D",
            SortKey::CloseWins => "V Aj",
            SortKey::CloseLosses => "D Aj",
        }
    }

    fn value(self, row: &StandingRow) -> SortValue<'_> {
        match self {
            SortKey::Rank => SortValue::Number(row.league_rank as i64),
            SortKey::Name => SortValue::Text(&row.name),
            SortKey::Manager => SortValue::Text(&row.manager_name),
            SortKey::H2hPoints => SortValue::Number(row.h2h_points as i64),
            SortKey::TotalPoints => SortValue::Number(row.total_points as i64),
            SortKey::Wins => SortValue::Number(row.stats.wins as i64),
            SortKey::Draws => SortValue::Number(row.stats.draws as i64),
            SortKey::Losses => SortValue::Number(row.stats.losses as i64),
            SortKey::CloseWins => SortValue::Number(row.stats.close_wins as i64),
            SortKey::CloseLosses => SortValue::Number(row.stats.close_losses as i64),
        }
    }
}

enum SortValue<'a> {
    Text(&'a str),
    Number(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Rank,
            direction: SortDirection::Asc,
        }
    }
}

impl SortConfig {
    /// Header click: same key flips the direction, a new key starts ascending.
    pub fn sort_table(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn compare(&self, a: &StandingRow, b: &StandingRow) -> Ordering {
        let ord = match (self.key.value(a), self.key.value(b)) {
            (SortValue::Text(x), SortValue::Text(y)) => locale_cmp(x, y),
            (SortValue::Number(x), SortValue::Number(y)) => x.cmp(&y),
            (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
            (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// Accent- and case-insensitive ordering with a code-point tie-break, close to a collator
/// for Latin names.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

pub fn sort_rows(rows: &[StandingRow], sort: &SortConfig) -> Vec<StandingRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| sort.compare(a, b));
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsLine {
    pub row: StandingRow,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsView {
    pub lines: Vec<StandingsLine>,
    pub sort: SortConfig,
}

const HIGHLIGHTED_ROWS: usize = 3;

/// Highlight follows display position, not league rank.
pub fn render_standings(rows: &[StandingRow], sort: &SortConfig) -> StandingsView {
    let lines = sort_rows(rows, sort)
        .into_iter()
        .enumerate()
        .map(|(idx, row)| StandingsLine {
            row,
            highlighted: idx < HIGHLIGHTED_ROWS,
        })
        .collect();
    StandingsView { lines, sort: *sort }
}
