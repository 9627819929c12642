use crate::standings::StandingRow;
use crate::stats::{MatchesByGameweek, Outcome};

pub const EMPTY_FIXTURES_MESSAGE: &str = "No hay partidos disponibles para esta jornada";
pub const HOME_PLACEHOLDER: &str = "Equipo 1";
pub const AWAY_PLACEHOLDER: &str = "Equipo 2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSide {
    pub team_id: u32,
    pub name: String,
    pub manager_name: String,
    pub points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureCard {
    pub home: FixtureSide,
    pub away: FixtureSide,
    /// From the first entry's point of view, styling only.
    pub outcome: Outcome,
}

impl FixtureCard {
    pub fn score(&self) -> String {
        format!("{} - {}", self.home.points, self.away.points)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixturesView {
    Empty { gameweek: u32, message: String },
    Cards { gameweek: u32, cards: Vec<FixtureCard> },
}

impl FixturesView {
    pub fn gameweek(&self) -> u32 {
        match self {
            FixturesView::Empty { gameweek, .. } | FixturesView::Cards { gameweek, .. } => {
                *gameweek
            }
        }
    }
}

pub fn render_fixtures(
    gameweek: u32,
    matches: &MatchesByGameweek,
    rows: &[StandingRow],
) -> FixturesView {
    let records = matches.get(&gameweek).map(Vec::as_slice).unwrap_or_default();
    if records.is_empty() {
        return FixturesView::Empty {
            gameweek,
            message: EMPTY_FIXTURES_MESSAGE.to_string(),
        };
    }

    let cards = records
        .iter()
        .map(|record| FixtureCard {
            home: resolve_side(rows, record.team1_id, record.team1_points, HOME_PLACEHOLDER),
            away: resolve_side(rows, record.team2_id, record.team2_points, AWAY_PLACEHOLDER),
            outcome: Outcome::from_diff(record.team1_points.saturating_sub(record.team2_points)),
        })
        .collect();
    FixturesView::Cards { gameweek, cards }
}

fn resolve_side(rows: &[StandingRow], team_id: u32, points: i32, placeholder: &str) -> FixtureSide {
    match rows.iter().find(|r| r.id == team_id) {
        Some(row) => FixtureSide {
            team_id,
            name: row.name.clone(),
            manager_name: row.manager_name.clone(),
            points,
        },
        None => FixtureSide {
            team_id,
            name: placeholder.to_string(),
            manager_name: String::new(),
            points,
        },
    }
}
