use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::config::settings::ValidationSettings;
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::services::MatchService;

// DELETE /admin/matches - wipes every match with its quarters and player lines
#[tracing::instrument(name = "Delete all matches", skip(pool, settings, claims), fields(admin = %claims.email))]
pub async fn delete_all_matches(
    pool: web::Data<SqlitePool>,
    settings: web::Data<ValidationSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let deleted = MatchService::new(pool.get_ref().clone(), settings.get_ref().clone())
        .delete_all_matches(&claims)
        .await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("{} match(es) deleted", deleted),
        "deleted": deleted,
    })))
}
