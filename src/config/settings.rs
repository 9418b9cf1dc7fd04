use std::env;
use config::{Config, File, ConfigError};
use dotenv::dotenv;
use secrecy::{ExposeSecret, SecretString};

use crate::config::jwt::JwtSettings;

#[derive(serde::Deserialize, Debug)]
pub struct Settings{
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub jwt: JwtConfig,
    pub auth: AuthSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
}

#[derive(serde::Deserialize, Debug)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub expiration_hours: i64,
}

#[derive(serde::Deserialize, Debug)]
pub struct DatabaseSettings{
    pub url: SecretString,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> SecretString {
        self.url.clone()
    }

    /// Human readable backend name, never includes credentials.
    pub fn backend_name(&self) -> &'static str {
        let url = self.url.expose_secret().to_lowercase();
        if url.starts_with("sqlite") {
            "SQLite"
        } else if url.starts_with("postgres") {
            "PostgreSQL"
        } else if url.starts_with("mysql") || url.starts_with("mariadb") {
            "MySQL/MariaDB"
        } else {
            "unknown"
        }
    }
}

#[derive(serde::Deserialize, Debug)]
pub struct ApplicationSettings{
    pub port: u16,
    pub host: String,
    pub log_level: String
}

/// Account policy: root admin, self-signup, password rules and login throttling.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct AuthSettings {
    pub admin_email: String,
    #[serde(default)]
    pub admin_password: Option<SecretString>,
    pub allow_self_signup: bool,
    pub bcrypt_cost: u32,
    pub min_password_length: usize,
    pub max_failed_logins: usize,
    pub failure_window_secs: u64,
}

impl AuthSettings {
    pub fn is_root_admin(&self, email: &str) -> bool {
        let root = self.admin_email.trim().to_lowercase();
        !root.is_empty() && root == email.trim().to_lowercase()
    }
}

/// Soft limits and policies applied by the match validator.
///
/// `None` on a ceiling disables the corresponding warning.
#[derive(serde::Deserialize, Debug, Clone)]
pub struct ValidationSettings {
    pub max_goals_per_quarter: Option<i64>,
    pub max_behinds_per_quarter: Option<i64>,
    pub max_points_per_quarter: Option<i64>,
    pub disallow_future_dates: bool,
    pub warn_if_season_mismatch_with_date: bool,
    pub expect_four_quarters: bool,
    pub max_venue_length: usize,
    /// Side used for the players-vs-declared check when the caller has no team.
    pub default_team_name: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_goals_per_quarter: Some(20),
            max_behinds_per_quarter: Some(25),
            max_points_per_quarter: Some(6 * 20 + 25),
            disallow_future_dates: false,
            warn_if_season_mismatch_with_date: true,
            expect_four_quarters: true,
            max_venue_length: 120,
            default_team_name: "Toulouse".to_string(),
        }
    }
}

pub fn get_config() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;

    let env_filename = format!("{}.yml", environment.as_str());
    let config = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yml")))
        .add_source(File::from(configuration_directory.join(env_filename)))
        .add_source(
            config::Environment::default()
                .prefix("APP")
                .prefix_separator("__")
                .separator("__")
        )
        .build()?;

    let mut settings = config.try_deserialize::<Settings>()?;
    apply_env_overrides(&mut settings);

    Ok(settings)
}

/// Plain environment variables recognised on top of the `APP__*` hierarchy.
fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(db_url) = env::var("DATABASE_URL") {
        settings.database.url = SecretString::new(db_url.into_boxed_str());
    }

    if let Ok(pool_size) = env::var("DB_POOL_SIZE") {
        match pool_size.trim().parse::<u32>() {
            Ok(size) if size > 0 => settings.database.max_connections = size,
            _ => tracing::warn!("Ignoring invalid DB_POOL_SIZE value: {}", pool_size),
        }
    }

    if let Ok(jwt_secret) = env::var("JWT_SECRET") {
        settings.jwt.secret = SecretString::new(jwt_secret.into_boxed_str());
    }

    if let Ok(admin_email) = env::var("ADMIN_EMAIL") {
        settings.auth.admin_email = admin_email.trim().to_lowercase();
    }

    if let Ok(admin_password) = env::var("ADMIN_PASSWORD") {
        settings.auth.admin_password = Some(SecretString::new(admin_password.into_boxed_str()));
    }

    if let Ok(allow) = env::var("ALLOW_SELF_SIGNUP") {
        settings.auth.allow_self_signup = parse_flag(&allow);
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. \
                Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_jwt_settings(settings: &Settings) -> JwtSettings {
    JwtSettings::new(
        settings.jwt.secret.expose_secret().to_string(),
        settings.jwt.expiration_hours,
    )
}
