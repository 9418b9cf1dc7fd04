use actix_web::web;
use secrecy::ExposeSecret;
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::jwt::{issue_token, IssuedToken};
use crate::auth::LoginThrottle;
use crate::config::jwt::JwtSettings;
use crate::config::settings::AuthSettings;
use crate::db::audit::{self, Actor};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::models::audit::AuditAction;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::user::{RegistrationRequest, User, UserResponse};
use crate::utils::normalize::{clean_optional, normalize_email};
use crate::utils::password::{hash_password, verify_password};

/// Length and confirmation rules for a new password.
pub fn check_new_password(
    password: &str,
    confirmation: Option<&str>,
    settings: &AuthSettings,
) -> AppResult<()> {
    if password.chars().count() < settings.min_password_length {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters long",
            settings.min_password_length
        )));
    }
    if let Some(confirmation) = confirmation {
        if confirmation != password {
            return Err(AppError::BadRequest("Passwords do not match".to_string()));
        }
    }
    Ok(())
}

/// Runs bcrypt on the blocking thread pool.
pub async fn hash_password_blocking(password: String, cost: u32) -> AppResult<String> {
    web::block(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password_blocking(password: String, hash: String) -> AppResult<bool> {
    web::block(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))
}

pub struct AuthService {
    pool: SqlitePool,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(pool: SqlitePool, settings: AuthSettings) -> Self {
        Self { pool, settings }
    }

    /// Failed attempts are counted per normalized email; once locked the
    /// password is not even checked.
    #[tracing::instrument(
        name = "Login user attempt",
        skip(self, request, throttle, jwt_settings),
        fields(email = %request.email)
    )]
    pub async fn login(
        &self,
        request: &LoginRequest,
        throttle: &LoginThrottle,
        jwt_settings: &JwtSettings,
    ) -> AppResult<LoginResponse> {
        let email = normalize_email(&request.email);
        if throttle.is_locked(&email) {
            tracing::warn!("Login locked for {}", email);
            return Err(AppError::TooManyAttempts);
        }

        let user = match users::get_user_by_email(&self.pool, &email).await? {
            Some(user) => user,
            None => {
                tracing::info!("User not found or invalid credentials");
                throttle.record_failure(&email);
                return Err(AppError::Unauthorized);
            }
        };

        let password = request.password.expose_secret().to_string();
        if !verify_password_blocking(password, user.password_hash.clone()).await? {
            tracing::info!("Invalid password");
            throttle.record_failure(&email);
            return Err(AppError::Unauthorized);
        }
        throttle.reset(&email);

        let IssuedToken { token, csrf_token, .. } = issue_token(&user, jwt_settings)?;

        if user.is_admin {
            audit::record(
                &self.pool,
                Actor { id: Some(user.id), email: &user.email },
                AuditAction::Login,
                "user",
                Some(user.id),
                &json!({ "is_admin": true }),
            )
            .await?;
            tracing::info!("Admin {} logged in", user.email);
        }

        Ok(LoginResponse {
            token,
            csrf_token,
            user: UserResponse::from(user),
        })
    }

    #[tracing::instrument(
        name = "Adding a new user",
        skip(self, request),
        fields(email = %request.email)
    )]
    pub async fn register(&self, request: &RegistrationRequest) -> AppResult<UserResponse> {
        if !self.settings.allow_self_signup {
            return Err(AppError::Forbidden);
        }
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
        let user = users::create_user(
            &self.pool,
            &email,
            &hash,
            team.as_deref(),
            self.settings.is_root_admin(&email),
        )
        .await?;

        tracing::info!("User {} registered", user.id);
        Ok(UserResponse::from(user))
    }

    /// Create the configured root admin at start-up when it does not exist
    /// yet. Returns whether an account was created.
    pub async fn ensure_root_admin(&self) -> AppResult<bool> {
        let email = normalize_email(&self.settings.admin_email);
        let Some(password) = self.settings.admin_password.as_ref() else {
            return Ok(false);
        };
        if email.is_empty() {
            return Ok(false);
        }
        if let Some(existing) = users::get_user_by_email(&self.pool, &email).await? {
            if !existing.is_admin {
                users::set_admin_flag(&self.pool, existing.id, true).await?;
                tracing::info!("Restored admin rights of root account {}", email);
            }
            return Ok(false);
        }

        let hash = hash_password_blocking(
            password.expose_secret().to_string(),
            self.settings.bcrypt_cost,
        )
        .await?;
        let user: User = users::create_user(&self.pool, &email, &hash, None, true).await?;
        tracing::info!("Root admin {} created with id {}", email, user.id);
        Ok(true)
    }
}
