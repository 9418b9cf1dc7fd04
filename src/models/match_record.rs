use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::MatchResult;

/// One quarter's score line for both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterLine {
    /// 0 means "not given"; normalization numbers it by position.
    #[serde(default)]
    pub q: i64,
    #[serde(default)]
    pub home_goals: i64,
    #[serde(default)]
    pub home_behinds: i64,
    #[serde(default)]
    pub home_points: i64,
    #[serde(default)]
    pub away_goals: i64,
    #[serde(default)]
    pub away_behinds: i64,
    #[serde(default)]
    pub away_points: i64,
}

/// Name given to player lines entered without one.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// A player's contribution to a match. `player_id` links to the roster when known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub player_id: Option<i64>,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub goals: i64,
    #[serde(default)]
    pub behinds: i64,
    #[serde(default)]
    pub points: i64,
}

/// The single shape a match takes between the API, the validators,
/// the services and the repositories.
///
/// Totals and date are optional so that missing values surface as
/// validation issues rather than deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub season_id: String,
    pub date: Option<NaiveDate>,
    pub venue: Option<String>,
    #[serde(default)]
    pub home_club: String,
    #[serde(default)]
    pub away_club: String,
    pub total_home_points: Option<i64>,
    pub total_away_points: Option<i64>,
    #[serde(default)]
    pub quarters: Vec<QuarterLine>,
    #[serde(default)]
    pub player_stats: Vec<PlayerStatLine>,
}

impl MatchRecord {
    pub fn home_points(&self) -> i64 {
        self.total_home_points.unwrap_or(0)
    }

    pub fn away_points(&self) -> i64 {
        self.total_away_points.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub season_id: String,
    pub date: NaiveDate,
    pub venue: Option<String>,
    pub home_club: String,
    pub away_club: String,
    pub total_home_points: i64,
    pub total_away_points: i64,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuarterRow {
    pub id: i64,
    pub match_id: i64,
    pub q: i64,
    pub home_goals: i64,
    pub home_behinds: i64,
    pub home_points: i64,
    pub away_goals: i64,
    pub away_behinds: i64,
    pub away_points: i64,
}

impl From<&QuarterRow> for QuarterLine {
    fn from(row: &QuarterRow) -> Self {
        Self {
            q: row.q,
            home_goals: row.home_goals,
            home_behinds: row.home_behinds,
            home_points: row.home_points,
            away_goals: row.away_goals,
            away_behinds: row.away_behinds,
            away_points: row.away_points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlayerStatRow {
    pub id: i64,
    pub match_id: i64,
    pub player_id: Option<i64>,
    pub player_name: String,
    pub goals: i64,
    pub behinds: i64,
    pub points: i64,
}

impl From<&PlayerStatRow> for PlayerStatLine {
    fn from(row: &PlayerStatRow) -> Self {
        Self {
            player_id: row.player_id,
            player_name: row.player_name.clone(),
            goals: row.goals,
            behinds: row.behinds,
            points: row.points,
        }
    }
}

/// A stored match with its quarters (ordered by number) and player lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDetail {
    #[serde(flatten)]
    pub summary: MatchRow,
    pub quarters: Vec<QuarterRow>,
    pub player_stats: Vec<PlayerStatRow>,
}

impl MatchDetail {
    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            season_id: self.summary.season_id.clone(),
            date: Some(self.summary.date),
            venue: self.summary.venue.clone(),
            home_club: self.summary.home_club.clone(),
            away_club: self.summary.away_club.clone(),
            total_home_points: Some(self.summary.total_home_points),
            total_away_points: Some(self.summary.total_away_points),
            quarters: self.quarters.iter().map(QuarterLine::from).collect(),
            player_stats: self.player_stats.iter().map(PlayerStatLine::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MatchListQuery {
    pub limit: Option<i64>,
    pub season: Option<String>,
    pub team: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplacePlayerStatsRequest {
    pub player_stats: Vec<PlayerStatLine>,
}

/// Outcome of validating a match without saving it.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchPreview {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub total_home_points: i64,
    pub total_away_points: i64,
    pub home_scoreline: String,
    pub away_scoreline: String,
    pub result: MatchResult,
    pub margin: i64,
}

/// Result of a successful save; warnings never block.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedMatch {
    pub id: i64,
    pub total_home_points: i64,
    pub total_away_points: i64,
    pub warnings: Vec<String>,
}
