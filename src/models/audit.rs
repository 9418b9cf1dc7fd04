//! Audit trail records. Rows are only ever inserted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: i64,
    pub actor_id: Option<i64>,
    pub actor_email: Option<String>,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<i64>,
    /// JSON document describing the change
    pub payload: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    MatchCreated,
    MatchUpdated,
    MatchDeleted,
    AllMatchesDeleted,
    PlayerStatsReplaced,
    PlayerRenamed,
    PlayerDeleted,
    UserCreated,
    UserTeamChanged,
    UserAdminChanged,
    UserPasswordReset,
    UserDeleted,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::MatchCreated => "match.created",
            AuditAction::MatchUpdated => "match.updated",
            AuditAction::MatchDeleted => "match.deleted",
            AuditAction::AllMatchesDeleted => "match.deleted_all",
            AuditAction::PlayerStatsReplaced => "match.player_stats_replaced",
            AuditAction::PlayerRenamed => "player.renamed",
            AuditAction::PlayerDeleted => "player.deleted",
            AuditAction::UserCreated => "user.created",
            AuditAction::UserTeamChanged => "user.team_changed",
            AuditAction::UserAdminChanged => "user.admin_changed",
            AuditAction::UserPasswordReset => "user.password_reset",
            AuditAction::UserDeleted => "user.deleted",
        }
    }
}
