// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::auth::LoginThrottle;
use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::models::auth::LoginRequest;
use crate::services::AuthService;

#[tracing::instrument(
    name = "Login request",
    skip(login_form, pool, jwt_settings, auth_settings, throttle),
    fields(email = %login_form.email)
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<SqlitePool>,
    jwt_settings: web::Data<JwtSettings>,
    auth_settings: web::Data<AuthSettings>,
    throttle: web::Data<LoginThrottle>,
) -> Result<HttpResponse, AppError> {
    let service = AuthService::new(pool.get_ref().clone(), auth_settings.get_ref().clone());
    let response = service
        .login(&login_form, throttle.get_ref(), jwt_settings.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
