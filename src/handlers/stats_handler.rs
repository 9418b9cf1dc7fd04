use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::settings::ValidationSettings;
use crate::db::{matches, stats};
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::models::stats::{MatchesSummary, TeamStatsQuery};

pub async fn list_seasons(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let seasons = matches::list_all_seasons(pool.get_ref(), &claims.scope()).await?;
    Ok(HttpResponse::Ok().json(seasons))
}

#[tracing::instrument(name = "Season leaderboard", skip(pool, claims), fields(user = %claims.email))]
pub async fn season_leaderboard(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let entries = stats::season_leaderboard(pool.get_ref(), &claims.scope(), &path).await?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Users get their own team; admins pick one with `club`, or the default team.
pub async fn team_summary(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
    query: web::Query<TeamStatsQuery>,
) -> Result<HttpResponse, AppError> {
    let club = claims
        .scope()
        .roster_club(query.club.as_deref())?
        .unwrap_or_else(|| settings.default_team_name.clone());
    let summary = stats::team_season_summary(pool.get_ref(), &path, &club).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub async fn matches_summary(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let scope = claims.scope();
    let summary = MatchesSummary {
        total_matches: matches::count_matches(pool.get_ref(), &scope).await?,
        latest: matches::get_latest_match(pool.get_ref(), &scope).await?,
        earliest: matches::get_earliest_match(pool.get_ref(), &scope).await?,
    };
    Ok(HttpResponse::Ok().json(summary))
}
