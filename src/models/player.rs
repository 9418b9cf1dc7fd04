use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub club: String,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub club: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct PlayerSearchQuery {
    pub q: String,
    pub club: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertPlayersRequest {
    pub names: Vec<String>,
    pub club: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenamePlayerRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SeasonFilter {
    pub season: Option<String>,
}

/// Career or season totals for one roster player.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTotals {
    pub player_id: i64,
    pub season_id: Option<String>,
    pub goals: i64,
    pub behinds: i64,
    pub points: i64,
    pub games: i64,
}
