use serde::{Deserialize, Serialize};

use crate::models::match_record::MatchRow;

/// One line of the season scoring leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub goals: i64,
    pub behinds: i64,
    pub points: i64,
    pub games: i64,
    pub avg_points_per_game: f64,
    /// Goals as a percentage of scoring shots
    pub accuracy_pct: f64,
}

/// Points for and against one club over a season.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSeasonSummary {
    pub club: String,
    pub season_id: String,
    pub games: i64,
    pub points_for: i64,
    pub points_against: i64,
    pub avg_points_for: f64,
    pub avg_points_against: f64,
    pub differential: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchesSummary {
    pub total_matches: i64,
    pub latest: Option<MatchRow>,
    pub earliest: Option<MatchRow>,
}

#[derive(Debug, Deserialize)]
pub struct TeamStatsQuery {
    pub club: Option<String>,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
