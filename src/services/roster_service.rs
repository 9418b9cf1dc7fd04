use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::Claims;
use crate::db::audit::{self, Actor};
use crate::db::helpers::require_record;
use crate::db::{matches, players};
use crate::error::{AppError, AppResult};
use crate::models::audit::AuditAction;
use crate::models::match_record::MatchRow;
use crate::models::player::{Player, PlayerTotals};

/// Roster management. Users work on their own team's players only.
pub struct RosterService {
    pool: SqlitePool,
}

impl RosterService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Load a player the caller may manage.
    async fn load(&self, player_id: i64, claims: &Claims) -> AppResult<Player> {
        let player = require_record(players::get_player_by_id(&self.pool, player_id).await?, "Player")?;
        if !claims.scope().permits_club(&player.club) {
            return Err(AppError::Forbidden);
        }
        Ok(player)
    }

    pub async fn list(&self, claims: &Claims, club: Option<&str>, include_inactive: bool) -> AppResult<Vec<Player>> {
        let club = claims.scope().roster_club(club)?;
        Ok(players::list_players(&self.pool, club.as_deref(), include_inactive).await?)
    }

    pub async fn search(&self, claims: &Claims, query: &str, club: Option<&str>) -> AppResult<Vec<Player>> {
        let club = claims.scope().roster_club(club)?;
        Ok(players::search_players(&self.pool, query, club.as_deref()).await?)
    }

    pub async fn count(&self, claims: &Claims, club: Option<&str>, active_only: bool) -> AppResult<i64> {
        let club = claims
            .scope()
            .roster_club(club)?
            .ok_or_else(|| AppError::BadRequest("A club is required".to_string()))?;
        Ok(players::count_players(&self.pool, &club, active_only).await?)
    }

    /// Returns the roster after the missing names were added.
    pub async fn upsert(&self, claims: &Claims, names: &[String], club: Option<&str>) -> AppResult<Vec<Player>> {
        let club = claims
            .scope()
            .roster_club(club)?
            .ok_or_else(|| AppError::BadRequest("A club is required".to_string()))?;

        let mut tx = self.pool.begin().await?;
        players::upsert_players(&mut tx, names, &club).await?;
        tx.commit().await?;

        Ok(players::list_players(&self.pool, Some(&club), false).await?)
    }

    pub async fn get(&self, player_id: i64, claims: &Claims) -> AppResult<Player> {
        self.load(player_id, claims).await
    }

    /// A name already taken in the club is a conflict.
    pub async fn rename(&self, player_id: i64, new_name: &str, claims: &Claims) -> AppResult<Player> {
        let before = self.load(player_id, claims).await?;
        if new_name.trim().is_empty() {
            return Err(AppError::BadRequest("The new name cannot be empty".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        if !players::rename_player(&mut *tx, player_id, new_name).await? {
            return Err(AppError::Conflict(format!(
                "A player named {} already exists in {}",
                new_name.trim(),
                before.club
            )));
        }
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::PlayerRenamed,
            "player",
            Some(player_id),
            &json!({ "before": before.name, "after": new_name.trim() }),
        )
        .await?;
        tx.commit().await?;

        self.load(player_id, claims).await
    }

    pub async fn set_active(&self, player_id: i64, active: bool, claims: &Claims) -> AppResult<Player> {
        self.load(player_id, claims).await?;
        let changed = if active {
            players::reactivate_player(&self.pool, player_id).await?
        } else {
            players::deactivate_player(&self.pool, player_id).await?
        };
        if !changed {
            return Err(AppError::not_found("Player"));
        }
        self.load(player_id, claims).await
    }

    pub async fn delete(&self, player_id: i64, claims: &Claims) -> AppResult<()> {
        if !claims.scope().is_admin() {
            return Err(AppError::Forbidden);
        }
        let player = self.load(player_id, claims).await?;

        let mut tx = self.pool.begin().await?;
        players::delete_player(&mut *tx, player_id).await?;
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::PlayerDeleted,
            "player",
            Some(player_id),
            &json!({ "name": player.name, "club": player.club }),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn matches(&self, player_id: i64, season: Option<&str>, claims: &Claims) -> AppResult<Vec<MatchRow>> {
        self.load(player_id, claims).await?;
        Ok(matches::get_matches_for_player(&self.pool, &claims.scope(), player_id, season).await?)
    }

    pub async fn totals(&self, player_id: i64, season: Option<&str>, claims: &Claims) -> AppResult<PlayerTotals> {
        self.load(player_id, claims).await?;
        Ok(matches::get_player_totals(&self.pool, player_id, season).await?)
    }
}
