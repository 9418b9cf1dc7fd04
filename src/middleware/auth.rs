// src/middleware/auth.rs
use std::future::{ready, Ready};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, http::{header, Method}, web, Error, HttpMessage
};
use futures_util::future::LocalBoxFuture;

use crate::auth::jwt::decode_token;
use crate::config::jwt::JwtSettings;
use crate::error::AppError;

pub use crate::auth::jwt::Claims;

pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Bearer token from the `Authorization` header, decoded and checked.
pub fn validate_jwt_from_request(req: &ServiceRequest) -> Result<Claims, AppError> {
    let jwt_settings = req.app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| AppError::Internal("JWT settings not configured".to_string()))?;

    let auth_header = req.headers()
        .get(header::AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    decode_token(token, jwt_settings).map_err(|e| {
        tracing::info!("Rejected token: {:?}", e);
        AppError::Unauthorized
    })
}

/// State-changing requests must echo the session's CSRF token.
pub fn check_csrf(req: &ServiceRequest, claims: &Claims) -> Result<(), AppError> {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(());
    }
    let sent = req.headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if sent.is_empty() || sent != claims.csrf {
        tracing::warn!("CSRF token mismatch for {} {}", req.method(), req.path());
        return Err(AppError::CsrfMismatch);
    }
    Ok(())
}

/// Requires a valid session.
pub struct AuthMiddleware;

/// Requires a valid session belonging to an admin.
pub struct AdminMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionGate<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGate { service, admin_only: false }))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionGate<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGate { service, admin_only: true }))
    }
}

pub struct SessionGate<S> {
    service: S,
    admin_only: bool,
}

impl<S> SessionGate<S> {
    /// Token first, then the admin flag, then CSRF on writes.
    fn admit(&self, req: &ServiceRequest) -> Result<Claims, AppError> {
        let claims = validate_jwt_from_request(req)?;
        if self.admin_only && !claims.is_admin {
            tracing::warn!("Non-admin user attempted admin access: {}", claims.email);
            return Err(AppError::Forbidden);
        }
        check_csrf(req, &claims)?;
        Ok(claims)
    }
}

impl<S, B> Service<ServiceRequest> for SessionGate<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let claims = match self.admit(&req) {
            Ok(claims) => claims,
            Err(e) => return Box::pin(async move { Err(e.into()) }),
        };

        // Handlers read the claims through `web::ReqData<Claims>`
        req.extensions_mut().insert(claims);

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}
