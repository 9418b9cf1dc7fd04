use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::config::settings::AuthSettings;
use crate::error::AppError;
use crate::handlers::match_handler::csv_attachment;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::user::{
    DeleteUserRequest, RegistrationRequest, ResetPasswordRequest, SetAdminRequest, UpdateTeamRequest,
};
use crate::services::export_service::{self, ExportFormat, ExportQuery};
use crate::services::UserService;

fn users(pool: &web::Data<SqlitePool>, settings: &web::Data<AuthSettings>) -> UserService {
    UserService::new(pool.get_ref().clone(), settings.get_ref().clone())
}

// GET /admin/users - newest accounts first
pub async fn get_users(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
) -> Result<HttpResponse, AppError> {
    let list = users(&pool, &settings).list_users().await?;
    Ok(HttpResponse::Ok().json(list))
}

// POST /admin/users
pub async fn create_user(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    body: web::Json<RegistrationRequest>,
) -> Result<HttpResponse, AppError> {
    let user = users(&pool, &settings).create_user(&body, &claims).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("User created", user)))
}

// GET /admin/users/export
pub async fn export_users(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, AppError> {
    let list = users(&pool, &settings).list_users().await?;
    let table = export_service::users_table(&list);
    match query.format {
        ExportFormat::Csv => csv_attachment(&table, "users.csv"),
        ExportFormat::Json => Ok(HttpResponse::Ok().json(table.to_json())),
    }
}

// PATCH /admin/users/{id}/team
pub async fn update_user_team(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<UpdateTeamRequest>,
) -> Result<HttpResponse, AppError> {
    let user = users(&pool, &settings)
        .update_team(path.into_inner(), body.team_name.as_deref(), &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team updated", user)))
}

// PATCH /admin/users/{id}/admin
pub async fn set_admin_flag(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<SetAdminRequest>,
) -> Result<HttpResponse, AppError> {
    let user = users(&pool, &settings)
        .set_admin(path.into_inner(), body.is_admin, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Admin flag updated", user)))
}

// PUT /admin/users/{id}/password
pub async fn reset_password(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    users(&pool, &settings)
        .reset_password(path.into_inner(), &body, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Password reset")))
}

// DELETE /admin/users/{id} - body must repeat the account's email
pub async fn delete_user(
    pool: web::Data<SqlitePool>,
    settings: web::Data<AuthSettings>,
    claims: web::ReqData<Claims>,
    path: web::Path<i64>,
    body: web::Json<DeleteUserRequest>,
) -> Result<HttpResponse, AppError> {
    users(&pool, &settings)
        .delete_user(path.into_inner(), &body.confirm_email, &claims)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("User deleted")))
}
