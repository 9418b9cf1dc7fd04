use actix_web::{post, web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::handlers::registration_handler::register_user;
use crate::models::user::RegistrationRequest;

#[post("/register_user")]
async fn register(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<SqlitePool>,
    auth_settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    register_user(user_form, pool, auth_settings).await
}
