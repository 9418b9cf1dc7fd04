use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::player::{
    PlayerSearchQuery, RenamePlayerRequest, RosterQuery, SeasonFilter, UpsertPlayersRequest,
};
use crate::services::RosterService;

fn roster(pool: &web::Data<SqlitePool>) -> RosterService {
    RosterService::new(pool.get_ref().clone())
}

#[tracing::instrument(name = "List roster", skip(pool, claims, query), fields(user = %claims.email))]
pub async fn list_players(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, AppError> {
    let players = roster(&pool)
        .list(&claims, query.club.as_deref(), query.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(players))
}

pub async fn search_players(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    query: web::Query<PlayerSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let players = roster(&pool)
        .search(&claims, &query.q, query.club.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(players))
}

pub async fn count_players(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    query: web::Query<RosterQuery>,
) -> Result<HttpResponse, AppError> {
    let count = roster(&pool)
        .count(&claims, query.club.as_deref(), !query.include_inactive)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

pub async fn upsert_players(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    body: web::Json<UpsertPlayersRequest>,
) -> Result<HttpResponse, AppError> {
    let players = roster(&pool)
        .upsert(&claims, &body.names, body.club.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(players))
}

pub async fn get_player(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let player = roster(&pool).get(path.into_inner(), &claims).await?;
    Ok(HttpResponse::Ok().json(player))
}

pub async fn rename_player(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<RenamePlayerRequest>,
) -> Result<HttpResponse, AppError> {
    let player = roster(&pool)
        .rename(path.into_inner(), &body.name, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player renamed", player)))
}

pub async fn deactivate_player(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let player = roster(&pool)
        .set_active(path.into_inner(), false, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player deactivated", player)))
}

pub async fn reactivate_player(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let player = roster(&pool)
        .set_active(path.into_inner(), true, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player reactivated", player)))
}

pub async fn delete_player(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    roster(&pool).delete(path.into_inner(), &claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Player deleted")))
}

pub async fn player_matches(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    query: web::Query<SeasonFilter>,
) -> Result<HttpResponse, AppError> {
    let rows = roster(&pool)
        .matches(path.into_inner(), query.season.as_deref(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn player_totals(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    query: web::Query<SeasonFilter>,
) -> Result<HttpResponse, AppError> {
    let totals = roster(&pool)
        .totals(path.into_inner(), query.season.as_deref(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(totals))
}
