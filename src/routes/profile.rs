use actix_web::{get, patch, put, web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::handlers::profile_handler::{change_password, change_team, get_profile};
use crate::middleware::auth::Claims;
use crate::models::user::{ChangePasswordRequest, UpdateTeamRequest};

#[get("")]
async fn get_own_profile(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    get_profile(pool, settings, claims).await
}

#[patch("/team")]
async fn update_own_team(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    jwt_settings: web::Data<JwtSettings>,
    claims: web::ReqData<Claims>,
    body: web::Json<UpdateTeamRequest>,
) -> Result<HttpResponse, AppError> {
    change_team(pool, settings, jwt_settings, claims, body).await
}

#[put("/password")]
async fn update_own_password(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    change_password(pool, settings, claims, body).await
}
