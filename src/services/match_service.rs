use serde_json::json;
use sqlx::{SqliteConnection, SqlitePool};

use crate::auth::{AccessScope, Claims};
use crate::config::settings::ValidationSettings;
use crate::db::audit::{self, Actor};
use crate::db::helpers::require_record;
use crate::db::{matches, players};
use crate::error::{AppError, AppResult};
use crate::game::scoring::{compute_totals_from_quarters, margin, scoreline_home_away, winner};
use crate::models::audit::AuditAction;
use crate::models::common::TeamSide;
use crate::models::match_record::{
    MatchDetail, MatchPreview, MatchRecord, PlayerStatLine, SavedMatch, UNKNOWN_PLAYER,
};
use crate::utils::normalize::clean_optional;
use crate::validation::{MatchValidator, TeamSelector, ValidationReport};

/// Trim free text, drop an empty venue, name anonymous player lines and
/// number quarters given without one by position.
pub fn normalize(mut record: MatchRecord) -> MatchRecord {
    record.season_id = record.season_id.trim().to_string();
    record.venue = clean_optional(record.venue.as_deref());
    record.home_club = record.home_club.trim().to_string();
    record.away_club = record.away_club.trim().to_string();

    for (idx, quarter) in record.quarters.iter_mut().enumerate() {
        if quarter.q == 0 {
            quarter.q = idx as i64 + 1;
        }
    }
    record.player_stats = normalize_player_lines(record.player_stats);
    record
}

fn normalize_player_lines(rows: Vec<PlayerStatLine>) -> Vec<PlayerStatLine> {
    rows.into_iter()
        .map(|mut row| {
            row.player_name = clean_optional(Some(&row.player_name))
                .unwrap_or_else(|| UNKNOWN_PLAYER.to_string());
            row
        })
        .collect()
}

/// Pick the side the player lines belong to: the caller's team when it
/// played, else the configured default team.
pub fn resolve_team(
    record: &MatchRecord,
    claims: &Claims,
    settings: &ValidationSettings,
) -> TeamSelector {
    let candidates = [
        claims.team_name.as_deref(),
        Some(settings.default_team_name.as_str()),
    ];
    candidates
        .into_iter()
        .flatten()
        .map(|name| TeamSelector::Name(name.to_string()))
        .find(|selector| selector.resolve(record).is_some())
        .unwrap_or(TeamSelector::Unspecified)
}

pub struct MatchService {
    pool: SqlitePool,
    settings: ValidationSettings,
}

impl MatchService {
    pub fn new(pool: SqlitePool, settings: ValidationSettings) -> Self {
        Self { pool, settings }
    }

    fn validator(&self) -> MatchValidator {
        MatchValidator::new(self.settings.clone())
    }

    /// Normalize, recompute totals from quarters, then validate.
    fn prepare(&self, record: MatchRecord, claims: &Claims) -> (MatchRecord, TeamSelector, ValidationReport) {
        let mut record = normalize(record);
        compute_totals_from_quarters(&mut record);
        let team = resolve_team(&record, claims, &self.settings);
        let report = self.validator().validate_match(&record, &team);
        (record, team, report)
    }

    /// Everything a save would check, without saving.
    pub fn preview(&self, record: MatchRecord, claims: &Claims) -> MatchPreview {
        let (record, _, report) = self.prepare(record, claims);
        let (home_scoreline, away_scoreline) = scoreline_home_away(&record);
        let (home, away) = (record.home_points(), record.away_points());

        MatchPreview {
            ok: report.ok,
            errors: report.error_messages(),
            warnings: report.warning_messages(),
            total_home_points: home,
            total_away_points: away,
            home_scoreline,
            away_scoreline,
            result: winner(home, away),
            margin: margin(home, away),
        }
    }

    #[tracing::instrument(name = "Save post-match", skip(self, record, claims), fields(user = %claims.email))]
    pub async fn save_post_match(&self, record: MatchRecord, claims: &Claims) -> AppResult<SavedMatch> {
        let (mut record, team, report) = self.prepare(record, claims);
        if !report.ok {
            tracing::info!("Match rejected: {}", report.summary());
            return Err(AppError::Validation(report));
        }

        let scope = claims.scope();
        if !scope.permits(&record.home_club, &record.away_club) {
            tracing::warn!("{} may not record {} v {}", claims.email, record.home_club, record.away_club);
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        link_roster(&mut tx, &mut record, &team, &scope).await?;
        let id = matches::insert_match(&mut tx, &record, claims.user_id()).await?;
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::MatchCreated,
            "match",
            Some(id),
            &json!({
                "season_id": record.season_id,
                "home_club": record.home_club,
                "away_club": record.away_club,
                "total_home_points": record.home_points(),
                "total_away_points": record.away_points(),
            }),
        )
        .await?;
        tx.commit().await?;

        tracing::info!("Match {} saved with {} warning(s)", id, report.warnings.len());
        Ok(SavedMatch {
            id,
            total_home_points: record.home_points(),
            total_away_points: record.away_points(),
            warnings: report.warning_messages(),
        })
    }

    /// The caller must be allowed on the stored match and on the new version.
    #[tracing::instrument(name = "Update post-match", skip(self, record, claims), fields(user = %claims.email))]
    pub async fn update_post_match(
        &self,
        match_id: i64,
        record: MatchRecord,
        claims: &Claims,
    ) -> AppResult<SavedMatch> {
        let scope = claims.scope();
        let stored = require_record(matches::get_match_row(&self.pool, match_id).await?, "Match")?;
        if !scope.permits(&stored.home_club, &stored.away_club) {
            return Err(AppError::Forbidden);
        }

        let (mut record, team, report) = self.prepare(record, claims);
        if !report.ok {
            return Err(AppError::Validation(report));
        }
        if !scope.permits(&record.home_club, &record.away_club) {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        link_roster(&mut tx, &mut record, &team, &scope).await?;
        if !matches::update_match(&mut tx, match_id, &record).await? {
            return Err(AppError::not_found("Match"));
        }
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::MatchUpdated,
            "match",
            Some(match_id),
            &json!({
                "before": {
                    "total_home_points": stored.total_home_points,
                    "total_away_points": stored.total_away_points,
                },
                "after": {
                    "total_home_points": record.home_points(),
                    "total_away_points": record.away_points(),
                },
            }),
        )
        .await?;
        tx.commit().await?;

        Ok(SavedMatch {
            id: match_id,
            total_home_points: record.home_points(),
            total_away_points: record.away_points(),
            warnings: report.warning_messages(),
        })
    }

    /// Check the new lines against the stored match, then swap them in
    /// atomically. Returns the warnings.
    #[tracing::instrument(name = "Replace player stats", skip(self, rows, claims), fields(user = %claims.email))]
    pub async fn replace_player_stats(
        &self,
        match_id: i64,
        rows: Vec<PlayerStatLine>,
        claims: &Claims,
    ) -> AppResult<Vec<String>> {
        let scope = claims.scope();
        let detail = self.get_match(match_id, claims).await?;

        let mut record = detail.to_record();
        record.player_stats = normalize_player_lines(rows);
        let team = resolve_team(&record, claims, &self.settings);

        let validator = self.validator();
        let mut issues = validator.validate_player_rows(&record.player_stats);
        issues.extend(validator.validate_duplicate_players(&record.player_stats));
        issues.extend(validator.validate_players_vs_declared(&record, &team));
        let report = ValidationReport::from_issues(issues);
        if !report.ok {
            return Err(AppError::Validation(report));
        }

        let mut tx = self.pool.begin().await?;
        link_roster(&mut tx, &mut record, &team, &scope).await?;
        matches::replace_player_stats(&mut tx, match_id, &record.player_stats).await?;
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::PlayerStatsReplaced,
            "match",
            Some(match_id),
            &json!({ "rows": record.player_stats.len() }),
        )
        .await?;
        tx.commit().await?;

        Ok(report.warning_messages())
    }

    pub async fn get_match(&self, match_id: i64, claims: &Claims) -> AppResult<MatchDetail> {
        let detail = require_record(matches::get_match(&self.pool, match_id).await?, "Match")?;
        if !claims.scope().permits(&detail.summary.home_club, &detail.summary.away_club) {
            return Err(AppError::Forbidden);
        }
        Ok(detail)
    }

    #[tracing::instrument(name = "Delete match", skip(self, claims), fields(user = %claims.email))]
    pub async fn delete_match(&self, match_id: i64, claims: &Claims) -> AppResult<()> {
        let stored = require_record(matches::get_match_row(&self.pool, match_id).await?, "Match")?;
        if !claims.scope().permits(&stored.home_club, &stored.away_club) {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        if !matches::delete_match(&mut *tx, match_id).await? {
            return Err(AppError::not_found("Match"));
        }
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::MatchDeleted,
            "match",
            Some(match_id),
            &json!({
                "season_id": stored.season_id,
                "home_club": stored.home_club,
                "away_club": stored.away_club,
                "date": stored.date,
            }),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Admin only; the route is already behind the admin middleware.
    pub async fn delete_all_matches(&self, claims: &Claims) -> AppResult<u64> {
        if !claims.scope().is_admin() {
            return Err(AppError::Forbidden);
        }
        let mut tx = self.pool.begin().await?;
        let deleted = matches::delete_all_matches(&mut *tx).await?;
        audit::record(
            &mut *tx,
            Actor::from(claims),
            AuditAction::AllMatchesDeleted,
            "match",
            None,
            &json!({ "deleted": deleted }),
        )
        .await?;
        tx.commit().await?;
        tracing::warn!("{} deleted all {} matches", claims.email, deleted);
        Ok(deleted)
    }
}

/// Add the resolved side's player names to that club's roster and link each
/// line to its roster entry by name. Links sent by the client are never
/// trusted; lines stay unlinked when no side is resolved.
async fn link_roster(
    conn: &mut SqliteConnection,
    record: &mut MatchRecord,
    team: &TeamSelector,
    scope: &AccessScope,
) -> Result<(), sqlx::Error> {
    for row in record.player_stats.iter_mut() {
        row.player_id = None;
    }
    let Some(side) = team.resolve(record) else {
        return Ok(());
    };
    let club = match (scope.team(), side) {
        (Some(own), _) => own.to_string(),
        (None, TeamSide::Home) => record.home_club.clone(),
        (None, TeamSide::Away) => record.away_club.clone(),
    };

    let names: Vec<String> = record
        .player_stats
        .iter()
        .filter(|row| row.player_name != UNKNOWN_PLAYER)
        .map(|row| row.player_name.clone())
        .collect();
    players::upsert_players(conn, &names, &club).await?;

    for row in record.player_stats.iter_mut() {
        if let Some(player) = players::get_player_by_name(&mut *conn, &row.player_name, &club).await? {
            row.player_id = Some(player.id);
        }
    }
    Ok(())
}
