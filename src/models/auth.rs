// src/models/auth.rs
use serde::{Deserialize, Serialize};
use secrecy::SecretString;

use crate::models::user::UserResponse;

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    #[serde(serialize_with = "crate::models::user::serialize_secret_string",
            deserialize_with = "crate::models::user::deserialize_secret_string")]
    pub password: SecretString,
}

/// Token plus the CSRF value the client must echo in `X-CSRF-Token` on writes.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub csrf_token: String,
    pub user: UserResponse,
}
