use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::jwt::{issue_token, IssuedToken};
use crate::auth::Claims;
use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthSettings;
use crate::db::audit::{self, Actor};
use crate::db::helpers::require_record;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::models::audit::AuditAction;
use crate::models::auth::LoginResponse;
use crate::models::user::{
    ChangePasswordRequest, RegistrationRequest, ResetPasswordRequest, User, UserResponse,
};
use crate::services::auth_service::{check_new_password, hash_password_blocking};
use crate::utils::normalize::{clean_optional, normalize_email};

/// Account management for admins, plus the self-service part of a profile.
pub struct UserService {
    pool: SqlitePool,
    settings: AuthSettings,
}

impl UserService {
    pub fn new(pool: SqlitePool, settings: AuthSettings) -> Self {
        Self { pool, settings }
    }

    async fn load(&self, user_id: i64) -> AppResult<User> {
        require_record(users::get_user_by_id(&self.pool, user_id).await?, "User")
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserResponse>> {
        let users = users::list_users(&self.pool).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Admin rights go to the root email only, whatever the request says.
    #[tracing::instrument(name = "Admin creates user", skip(self, request, actor), fields(email = %request.email))]
    pub async fn create_user(&self, request: &RegistrationRequest, actor: &Claims) -> AppResult<UserResponse> {
        let email = normalize_email(&request.email);
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest("A valid email is required".to_string()));
        }
        let password = request.password.expose_secret();
        check_new_password(password, None, &self.settings)?;
        if users::get_user_by_email(&self.pool, &email).await?.is_some() {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        let hash = hash_password_blocking(password.to_string(), self.settings.bcrypt_cost).await?;
        let team = clean_optional(request.team_name.as_deref());
        let is_admin = self.settings.is_root_admin(&email);

        let mut tx = self.pool.begin().await?;
        let user = users::create_user(&mut *tx, &email, &hash, team.as_deref(), is_admin).await?;
        audit::record(
            &mut *tx,
            Actor::from(actor),
            AuditAction::UserCreated,
            "user",
            Some(user.id),
            &json!({ "email": user.email, "team_name": user.team_name, "is_admin": user.is_admin }),
        )
        .await?;
        tx.commit().await?;

        Ok(UserResponse::from(user))
    }

    pub async fn update_team(&self, user_id: i64, team_name: Option<&str>, actor: &Claims) -> AppResult<UserResponse> {
        let before = self.load(user_id).await?;
        let team = clean_optional(team_name);

        let mut tx = self.pool.begin().await?;
        users::update_user_team(&mut *tx, user_id, team.as_deref()).await?;
        audit::record(
            &mut *tx,
            Actor::from(actor),
            AuditAction::UserTeamChanged,
            "user",
            Some(user_id),
            &json!({ "before": before.team_name, "after": team }),
        )
        .await?;
        tx.commit().await?;

        Ok(UserResponse::from(self.load(user_id).await?))
    }

    /// Only the root email may hold admin rights, and it never loses them.
    pub async fn set_admin(&self, user_id: i64, is_admin: bool, actor: &Claims) -> AppResult<UserResponse> {
        let user = self.load(user_id).await?;
        let is_root = self.settings.is_root_admin(&user.email);
        if is_root && !is_admin {
            return Err(AppError::BadRequest("The root admin cannot lose admin rights".to_string()));
        }
        if !is_root && is_admin {
            return Err(AppError::BadRequest("Only the root admin email may hold admin rights".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        users::set_admin_flag(&mut *tx, user_id, is_admin).await?;
        audit::record(
            &mut *tx,
            Actor::from(actor),
            AuditAction::UserAdminChanged,
            "user",
            Some(user_id),
            &json!({ "before": user.is_admin, "after": is_admin }),
        )
        .await?;
        tx.commit().await?;

        Ok(UserResponse::from(self.load(user_id).await?))
    }

    pub async fn reset_password(&self, user_id: i64, request: &ResetPasswordRequest, actor: &Claims) -> AppResult<()> {
        let user = self.load(user_id).await?;
        let password = request.new_password.expose_secret();
        check_new_password(password, Some(request.confirm_password.expose_secret()), &self.settings)?;
        let hash = hash_password_blocking(password.to_string(), self.settings.bcrypt_cost).await?;

        let mut tx = self.pool.begin().await?;
        users::set_password(&mut *tx, user.id, &hash).await?;
        audit::record(
            &mut *tx,
            Actor::from(actor),
            AuditAction::UserPasswordReset,
            "user",
            Some(user.id),
            &json!({ "email": user.email }),
        )
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// The confirmation must repeat the account's email. The root admin
    /// cannot be deleted.
    pub async fn delete_user(&self, user_id: i64, confirm_email: &str, actor: &Claims) -> AppResult<()> {
        let user = self.load(user_id).await?;
        if self.settings.is_root_admin(&user.email) {
            return Err(AppError::BadRequest("The root admin cannot be deleted".to_string()));
        }
        if normalize_email(confirm_email) != user.email {
            return Err(AppError::BadRequest("Confirmation email does not match".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        users::delete_user_by_id(&mut *tx, user_id).await?;
        audit::record(
            &mut *tx,
            Actor::from(actor),
            AuditAction::UserDeleted,
            "user",
            Some(user_id),
            &json!({ "email": user.email }),
        )
        .await?;
        tx.commit().await?;

        tracing::info!("User {} deleted by {}", user.email, actor.email);
        Ok(())
    }

    pub async fn profile(&self, claims: &Claims) -> AppResult<UserResponse> {
        let user_id = claims.user_id().ok_or(AppError::Unauthorized)?;
        Ok(UserResponse::from(self.load(user_id).await?))
    }

    /// Session claims are immutable, so the caller gets a fresh token
    /// carrying the new team.
    pub async fn change_own_team(
        &self,
        claims: &Claims,
        team_name: Option<&str>,
        jwt_settings: &JwtSettings,
    ) -> AppResult<LoginResponse> {
        let user_id = claims.user_id().ok_or(AppError::Unauthorized)?;
        self.update_team(user_id, team_name, claims).await?;

        let user = self.load(user_id).await?;
        let IssuedToken { token, csrf_token, .. } = issue_token(&user, jwt_settings)?;
        Ok(LoginResponse {
            token,
            csrf_token,
            user: UserResponse::from(user),
        })
    }

    pub async fn change_own_password(&self, claims: &Claims, request: &ChangePasswordRequest) -> AppResult<()> {
        let user_id = claims.user_id().ok_or(AppError::Unauthorized)?;
        let user = self.load(user_id).await?;
        let current = request.current_password.expose_secret();
        if users::verify_password_by_email(&self.pool, &user.email, current).await?.is_none() {
            return Err(AppError::BadRequest("Current password is incorrect".to_string()));
        }

        let password = request.new_password.expose_secret();
        check_new_password(password, Some(request.confirm_password.expose_secret()), &self.settings)?;
        let hash = hash_password_blocking(password.to_string(), self.settings.bcrypt_cost).await?;
        users::set_password(&self.pool, user_id, &hash).await?;
        Ok(())
    }
}
