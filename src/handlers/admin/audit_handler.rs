use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db::audit;
use crate::error::AppError;
use crate::models::common::LimitQuery;

// GET /admin/audit - most recent entries first
pub async fn list_audit_logs(
    pool: web::Data<SqlitePool>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = audit::list_recent(pool.get_ref(), query.clamped(100, 1000)).await?;
    Ok(HttpResponse::Ok().json(entries))
}
