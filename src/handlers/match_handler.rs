use actix_web::{http::header, web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::config::settings::ValidationSettings;
use crate::db::matches::{self, MatchFilter};
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::match_record::{MatchListQuery, MatchRecord, ReplacePlayerStatsRequest};
use crate::services::export_service::{self, ExportFormat, ExportPart, ExportQuery, ExportTable};
use crate::services::MatchService;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 500;

fn match_service(pool: &web::Data<SqlitePool>, settings: &web::Data<ValidationSettings>) -> MatchService {
    MatchService::new(pool.get_ref().clone(), settings.get_ref().clone())
}

impl From<&MatchListQuery> for MatchFilter {
    fn from(query: &MatchListQuery) -> Self {
        MatchFilter {
            season: query.season.clone().filter(|s| !s.trim().is_empty()),
            team: query.team.clone().filter(|t| !t.trim().is_empty()),
            from: query.from,
            to: query.to,
            player_id: None,
        }
    }
}

pub(crate) fn csv_attachment(table: &ExportTable, filename: &str) -> Result<HttpResponse, AppError> {
    let body = table.to_csv()?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(body))
}

#[tracing::instrument(name = "List matches", skip(pool, claims, query), fields(user = %claims.email))]
pub async fn list_matches(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    query: web::Query<MatchListQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let filter = MatchFilter::from(&*query);
    let rows = matches::list_matches(pool.get_ref(), &claims.scope(), &filter, limit).await?;
    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create_match(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    record: web::Json<MatchRecord>,
) -> Result<HttpResponse, AppError> {
    let saved = match_service(&pool, &settings)
        .save_post_match(record.into_inner(), &claims)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Match saved", saved)))
}

/// Always 200; the preview carries `ok` plus the errors and warnings.
pub async fn validate_match(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    record: web::Json<MatchRecord>,
) -> HttpResponse {
    let preview = match_service(&pool, &settings).preview(record.into_inner(), &claims);
    HttpResponse::Ok().json(preview)
}

pub async fn get_match(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = match_service(&pool, &settings)
        .get_match(path.into_inner(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

pub async fn update_match(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    record: web::Json<MatchRecord>,
) -> Result<HttpResponse, AppError> {
    let saved = match_service(&pool, &settings)
        .update_post_match(path.into_inner(), record.into_inner(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match updated", saved)))
}

pub async fn delete_match(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let match_id = path.into_inner();
    match_service(&pool, &settings).delete_match(match_id, &claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message(format!("Match {} deleted", match_id))))
}

pub async fn get_quarters(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = match_service(&pool, &settings)
        .get_match(path.into_inner(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(detail.quarters))
}

pub async fn get_player_stats(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = match_service(&pool, &settings)
        .get_match(path.into_inner(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(detail.player_stats))
}

pub async fn replace_player_stats(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<ReplacePlayerStatsRequest>,
) -> Result<HttpResponse, AppError> {
    let warnings = match_service(&pool, &settings)
        .replace_player_stats(path.into_inner(), body.into_inner().player_stats, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Player stats replaced",
        "warnings": warnings,
    })))
}

/// Overview of the visible matches, filtered like the listing.
#[tracing::instrument(name = "Export matches", skip(pool, claims, query, export), fields(user = %claims.email))]
pub async fn export_matches(
    pool: web::Data<SqlitePool>,
    claims: web::ReqData<Claims>,
    query: web::Query<MatchListQuery>,
    export: web::Query<ExportQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = MatchFilter::from(&*query);
    let limit = query.limit.unwrap_or(i64::MAX).max(1);
    let rows = matches::list_matches(pool.get_ref(), &claims.scope(), &filter, limit).await?;
    let table = export_service::matches_overview(&rows);

    match export.format {
        ExportFormat::Csv => csv_attachment(&table, "matches.csv"),
        ExportFormat::Json => Ok(HttpResponse::Ok().json(table.to_json())),
    }
}

pub async fn export_match(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    export: web::Query<ExportQuery>,
) -> Result<HttpResponse, AppError> {
    let detail = match_service(&pool, &settings)
        .get_match(path.into_inner(), &claims)
        .await?;
    let team_label = claims
        .team_name
        .clone()
        .unwrap_or_else(|| settings.default_team_name.clone());
    let summary = &detail.summary;

    let table = match export.part {
        ExportPart::Bundle => {
            if export.format == ExportFormat::Csv {
                return Err(AppError::BadRequest(
                    "The match bundle is only available as JSON".to_string(),
                ));
            }
            return Ok(HttpResponse::Ok().json(export_service::match_bundle(&detail, &team_label)));
        }
        ExportPart::Match => export_service::matches_overview(std::slice::from_ref(summary)),
        ExportPart::Quarters => {
            export_service::quarters_table(&detail.quarters, &summary.home_club, &summary.away_club, true)
        }
        ExportPart::Players => export_service::player_stats_table(&detail.player_stats, &team_label, true),
    };

    match export.format {
        ExportFormat::Csv => {
            let part = match export.part {
                ExportPart::Quarters => "quarters",
                ExportPart::Players => "players",
                _ => "match",
            };
            csv_attachment(&table, &format!("match_{}_{}.csv", summary.id, part))
        }
        ExportFormat::Json => Ok(HttpResponse::Ok().json(table.to_json())),
    }
}
