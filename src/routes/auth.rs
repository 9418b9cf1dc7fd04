// src/routes/auth.rs
use actix_web::{post, web, HttpResponse};
use sqlx::SqlitePool;

use crate::auth::LoginThrottle;
use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::handlers::auth_handler::login_user;
use crate::models::auth::LoginRequest;

#[post("/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<SqlitePool>,
    jwt_settings: web::Data<JwtSettings>,
    auth_settings: web::Data<AuthSettings>,
    throttle: web::Data<LoginThrottle>,
) -> Result<HttpResponse, AppError> {
    login_user(login_form, pool, jwt_settings, auth_settings, throttle).await
}
