use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Largest winning/losing margin that still counts as a close result.
pub const CLOSE_MARGIN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub gameweek: u32,
    pub team1_id: u32,
    pub team1_points: i32,
    pub team2_id: u32,
    pub team2_points: i32,
}

impl MatchRecord {
    /// `(own, opponent, opponent_id)` when `team_id` plays in this match.
    pub fn perspective(&self, team_id: u32) -> Option<(i32, i32, u32)> {
        if self.team1_id == team_id {
            Some((self.team1_points, self.team2_points, self.team2_id))
        } else if self.team2_id == team_id {
            Some((self.team2_points, self.team1_points, self.team1_id))
        } else {
            None
        }
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }
}

pub type MatchesByGameweek = BTreeMap<u32, Vec<MatchRecord>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn from_diff(diff: i32) -> Self {
        match diff {
            d if d > 0 => Outcome::Win,
            0 => Outcome::Draw,
            _ => Outcome::Loss,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Win => "Victoria",
            Outcome::Draw => "Empate",
            Outcome::Loss => "Derrota",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub close_wins: u32,
    pub close_losses: u32,
}

impl TeamStats {
    pub fn played(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    pub fn record(&mut self, own: i32, opponent: i32) {
        let diff = own.saturating_sub(opponent);
        match Outcome::from_diff(diff) {
            Outcome::Win => {
                self.wins += 1;
                if diff <= CLOSE_MARGIN {
                    self.close_wins += 1;
                }
            }
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => {
                self.losses += 1;
                if diff.saturating_abs() <= CLOSE_MARGIN {
                    self.close_losses += 1;
                }
            }
        }
    }
}

/// Win/draw/loss and close-result counts for `team_id` over gameweeks `1..=current_gameweek`.
pub fn compute_team_stats(
    team_id: u32,
    matches: &MatchesByGameweek,
    current_gameweek: u32,
) -> TeamStats {
    let mut stats = TeamStats::default();
    for gameweek in 1..=current_gameweek {
        let Some(records) = matches.get(&gameweek) else {
            continue;
        };
        for record in records {
            if let Some((own, opponent, _)) = record.perspective(team_id) {
                stats.record(own, opponent);
            }
        }
    }
    stats
}

pub fn compute_all_stats(
    team_ids: &[u32],
    matches: &MatchesByGameweek,
    current_gameweek: u32,
) -> HashMap<u32, TeamStats> {
    team_ids
        .iter()
        .map(|id| (*id, compute_team_stats(*id, matches, current_gameweek)))
        .collect()
}
