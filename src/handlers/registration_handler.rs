use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::models::common::ApiResponse;
use crate::models::user::RegistrationRequest;
use crate::services::AuthService;

#[tracing::instrument(
    name = "Register user",
    skip(user_form, pool, auth_settings),
    fields(user = %user_form)
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<SqlitePool>,
    auth_settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let service = AuthService::new(pool.get_ref().clone(), auth_settings.get_ref().clone());
    let user = service.register(&user_form).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("User registered", user)))
}
