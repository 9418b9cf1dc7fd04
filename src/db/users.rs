use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::db::helpers::touched;
use crate::models::user::User;
use crate::utils::normalize::{clean_optional, normalize_email};
use crate::utils::password::verify_password;

const USER_COLUMNS: &str = "id, email, password_hash, team_name, is_admin, created_at";

pub async fn get_user_by_email(
    executor: impl SqliteExecutor<'_>,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(normalize_email(email))
        .fetch_optional(executor)
        .await
}

pub async fn get_user_by_id(
    executor: impl SqliteExecutor<'_>,
    user_id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// Newest accounts first.
pub async fn list_users(executor: impl SqliteExecutor<'_>) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at DESC, id DESC",
        USER_COLUMNS
    ))
    .fetch_all(executor)
    .await
}

/// The email is stored normalized; a duplicate surfaces as a unique violation.
#[tracing::instrument(name = "Insert user", skip(executor, password_hash))]
pub async fn create_user(
    executor: impl SqliteExecutor<'_>,
    email: &str,
    password_hash: &str,
    team_name: Option<&str>,
    is_admin: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, password_hash, team_name, is_admin, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(normalize_email(email))
    .bind(password_hash)
    .bind(clean_optional(team_name))
    .bind(is_admin)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

/// The user when the password matches, `None` otherwise (including unknown email).
pub async fn verify_password_by_email(
    pool: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Option<User>, sqlx::Error> {
    let Some(user) = get_user_by_email(pool, email).await? else {
        return Ok(None);
    };
    if verify_password(password, &user.password_hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

pub async fn set_password(
    executor: impl SqliteExecutor<'_>,
    user_id: i64,
    password_hash: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}

/// A blank team clears it.
pub async fn update_user_team(
    executor: impl SqliteExecutor<'_>,
    user_id: i64,
    team_name: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET team_name = ? WHERE id = ?")
        .bind(clean_optional(team_name))
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}

pub async fn set_admin_flag(
    executor: impl SqliteExecutor<'_>,
    user_id: i64,
    is_admin: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET is_admin = ? WHERE id = ?")
        .bind(is_admin)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}

pub async fn delete_user_by_id(
    executor: impl SqliteExecutor<'_>,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(touched(&result))
}
