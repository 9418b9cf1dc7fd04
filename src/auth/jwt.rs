use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::access::AccessScope;
use crate::config::jwt::JwtSettings;
use crate::models::user::User;

const CSRF_TOKEN_LENGTH: usize = 32;

/// The authenticated session. Immutable for the lifetime of the token:
/// a team change issues a new token rather than mutating this one.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // user id
    pub email: String,
    pub team_name: Option<String>,
    pub is_admin: bool,
    pub csrf: String,
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn scope(&self) -> AccessScope {
        AccessScope::new(self.is_admin, self.team_name.as_deref())
    }
}

pub struct IssuedToken {
    pub token: String,
    pub csrf_token: String,
    pub claims: Claims,
}

pub fn generate_csrf_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub fn issue_token(
    user: &User,
    jwt_settings: &JwtSettings,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + jwt_settings.ttl();
    let csrf_token = generate_csrf_token();

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        team_name: user.team_name.clone(),
        is_admin: user.is_admin,
        csrf: csrf_token.clone(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
    )?;

    Ok(IssuedToken {
        token,
        csrf_token,
        claims,
    })
}

/// Checks signature and expiry.
pub fn decode_token(
    token: &str,
    jwt_settings: &JwtSettings,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_settings.secret.expose_secret().as_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> User {
        User {
            id: 7,
            email: "coach@club.org".to_string(),
            password_hash: String::new(),
            team_name: Some("Toulouse".to_string()),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes_to_same_claims() {
        let settings = JwtSettings::new("test-secret".to_string(), 2);
        let issued = issue_token(&user(false), &settings).unwrap();
        let claims = decode_token(&issued.token, &settings).unwrap();

        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.team_name.as_deref(), Some("Toulouse"));
        assert_eq!(claims.csrf, issued.csrf_token);
        assert!(!claims.is_admin);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issued = issue_token(&user(true), &JwtSettings::new("one".to_string(), 2)).unwrap();
        assert!(decode_token(&issued.token, &JwtSettings::new("two".to_string(), 2)).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let settings = JwtSettings::new("test-secret".to_string(), -1);
        let issued = issue_token(&user(false), &settings).unwrap();
        assert!(decode_token(&issued.token, &settings).is_err());
    }

    #[test]
    fn csrf_tokens_are_random() {
        let a = generate_csrf_token();
        assert_eq!(a.len(), CSRF_TOKEN_LENGTH);
        assert_ne!(a, generate_csrf_token());
    }
}
