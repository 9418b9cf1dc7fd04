use chrono::Utc;
use serde_json::Value;
use sqlx::SqliteExecutor;

use crate::auth::Claims;
use crate::models::audit::{AuditAction, AuditLog};

/// Who performed an audited action.
#[derive(Debug, Clone, Copy)]
pub struct Actor<'a> {
    pub id: Option<i64>,
    pub email: &'a str,
}

impl<'a> From<&'a Claims> for Actor<'a> {
    fn from(claims: &'a Claims) -> Self {
        Self {
            id: claims.user_id(),
            email: &claims.email,
        }
    }
}

pub async fn record(
    executor: impl SqliteExecutor<'_>,
    actor: Actor<'_>,
    action: AuditAction,
    target_type: &str,
    target_id: Option<i64>,
    payload: &Value,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (actor_id, actor_email, action, target_type, target_id, payload, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(actor.id)
    .bind(actor.email)
    .bind(action.as_str())
    .bind(target_type)
    .bind(target_id)
    .bind(payload.to_string())
    .bind(Utc::now())
    .execute(executor)
    .await?;
    Ok(())
}

/// Most recent entries first.
pub async fn list_recent(
    executor: impl SqliteExecutor<'_>,
    limit: i64,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as::<_, AuditLog>(
        r#"
        SELECT id, actor_id, actor_email, action, target_type, target_id, payload, created_at
        FROM audit_logs
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await
}
