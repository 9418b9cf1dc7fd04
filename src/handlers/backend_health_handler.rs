use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

/// UP when the database answers, 503 otherwise.
pub async fn backend_health_check(pool: web::Data<SqlitePool>) -> HttpResponse {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "UP", "database": "UP" })),
        Err(e) => {
            tracing::error!("Health check could not reach the database: {:?}", e);
            HttpResponse::ServiceUnavailable().json(json!({ "status": "DOWN", "database": "DOWN" }))
        }
    }
}
