use chrono::Duration;
use secrecy::SecretString;
use serde::Deserialize;

/// HS256 signing key and session lifetime, from the `jwt` config section.
#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: SecretString,
    pub expiration_hours: i64,
}

impl JwtSettings {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into_boxed_str()),
            expiration_hours,
        }
    }

    /// How long an issued session stays valid.
    pub fn ttl(&self) -> Duration {
        Duration::hours(self.expiration_hours)
    }
}
