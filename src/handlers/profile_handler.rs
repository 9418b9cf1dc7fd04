use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::user::{ChangePasswordRequest, UpdateTeamRequest};
use crate::services::UserService;

fn users(pool: &web::Data<SqlitePool>, settings: &web::Data<AuthSettings>) -> UserService {
    UserService::new(pool.get_ref().clone(), settings.get_ref().clone())
}

#[tracing::instrument(name = "Get profile", skip(pool, settings, claims), fields(user = %claims.email))]
pub async fn get_profile(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let profile = users(&pool, &settings).profile(&claims).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Responds with a fresh token and CSRF value; the old ones keep the old team.
#[tracing::instrument(name = "Change own team", skip(pool, settings, jwt_settings, claims, body), fields(user = %claims.email))]
pub async fn change_team(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    jwt_settings: web::Data<JwtSettings>,
    claims: web::ReqData<Claims>,
    body: web::Json<UpdateTeamRequest>,
) -> Result<HttpResponse, AppError> {
    let session = users(&pool, &settings)
        .change_own_team(&claims, body.team_name.as_deref(), jwt_settings.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn change_password(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    users(&pool, &settings)
        .change_own_password(&claims, &body)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Password changed")))
}
