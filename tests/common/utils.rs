use secrecy::SecretString;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::net::TcpListener;
use uuid::Uuid;
use once_cell::sync::Lazy;
use reqwest::{Client, Response};

use footy_score::run;
use footy_score::config::settings::{get_config, get_jwt_settings};
use footy_score::db::pool::{build_pool, run_migrations};
use footy_score::telemetry::{get_subscriber, init_subscriber};

pub const ROOT_ADMIN_EMAIL: &str = "admin@footy.local";
pub const TEST_PASSWORD: &str = "password123";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout
        );
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink
        );
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: SqlitePool,
}

/// A logged-in user: bearer token plus the CSRF value to echo on writes.
pub struct TestSession {
    pub email: String,
    pub token: String,
    pub csrf: String,
}

pub async fn spawn_app() -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind random port");
    // Get port assigned by the OS
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    // Fresh database file per test
    let db_path = std::env::temp_dir().join(format!("footy-test-{}.db", Uuid::new_v4()));
    configuration.database.url =
        SecretString::new(format!("sqlite://{}", db_path.display()).into_boxed_str());
    configuration.auth.bcrypt_cost = 4;
    configuration.auth.allow_self_signup = true;
    configuration.auth.admin_email = ROOT_ADMIN_EMAIL.to_string();

    let connection_pool = build_pool(&configuration.database)
        .await
        .expect("Failed to open the test database.");
    run_migrations(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    let jwt_settings = get_jwt_settings(&configuration);
    let server = run(
        listener,
        connection_pool.clone(),
        jwt_settings,
        configuration.auth.clone(),
        configuration.validation.clone(),
    )
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);
    TestApp {
        address,
        db_pool: connection_pool
    }
}

pub async fn register(app_address: &str, email: &str, password: &str, team: Option<&str>) -> Response {
    Client::new()
        .post(&format!("{}/register_user", app_address))
        .json(&json!({
            "email": email,
            "password": password,
            "team_name": team,
        }))
        .send()
        .await
        .expect("Failed to register user.")
}

pub async fn login(app_address: &str, email: &str, password: &str) -> Response {
    Client::new()
        .post(&format!("{}/login", app_address))
        .json(&json!({
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to execute login request.")
}

pub async fn login_session(app_address: &str, email: &str, password: &str) -> TestSession {
    let response = login(app_address, email, password).await;
    assert!(response.status().is_success(), "login failed for {}", email);
    let body: Value = response.json().await.expect("Failed to parse login response");
    TestSession {
        email: email.to_string(),
        token: body["token"].as_str().expect("No token in response").to_string(),
        csrf: body["csrf_token"].as_str().expect("No CSRF token in response").to_string(),
    }
}

/// Registers a fresh account in `team` and logs it in.
pub async fn create_user_and_login(app_address: &str, team: Option<&str>) -> TestSession {
    let email = format!("user{}@example.com", Uuid::new_v4().simple());
    let response = register(app_address, &email, TEST_PASSWORD, team).await;
    assert!(response.status().is_success(), "registration failed for {}", email);
    login_session(app_address, &email, TEST_PASSWORD).await
}

/// Signs up with the root admin email, which grants admin rights.
pub async fn create_admin_and_login(app_address: &str) -> TestSession {
    let response = register(app_address, ROOT_ADMIN_EMAIL, TEST_PASSWORD, None).await;
    assert!(response.status().is_success(), "admin registration failed");
    login_session(app_address, ROOT_ADMIN_EMAIL, TEST_PASSWORD).await
}

pub async fn authed_get(app_address: &str, path: &str, session: &TestSession) -> Response {
    Client::new()
        .get(&format!("{}{}", app_address, path))
        .bearer_auth(&session.token)
        .send()
        .await
        .expect("Failed to execute request.")
}

/// Sends a JSON write with the session's bearer token and CSRF header.
pub async fn authed_send(
    app_address: &str,
    method: reqwest::Method,
    path: &str,
    session: &TestSession,
    body: Option<&Value>,
) -> Response {
    let mut request = Client::new()
        .request(method, &format!("{}{}", app_address, path))
        .bearer_auth(&session.token)
        .header("X-CSRF-Token", &session.csrf);
    if let Some(body) = body {
        request = request.json(body);
    }
    request.send().await.expect("Failed to execute request.")
}

/// Four consistent quarters: home 7.6 (48), away 5.8 (38).
pub fn sample_match(home: &str, away: &str) -> Value {
    json!({
        "season_id": "2024",
        "date": "2024-05-04",
        "venue": "Stade des Argoulets",
        "home_club": home,
        "away_club": away,
        "quarters": [
            { "q": 1, "home_goals": 2, "home_behinds": 1, "home_points": 13, "away_goals": 1, "away_behinds": 2, "away_points": 8 },
            { "q": 2, "home_goals": 1, "home_behinds": 2, "home_points": 8, "away_goals": 2, "away_behinds": 1, "away_points": 13 },
            { "q": 3, "home_goals": 3, "home_behinds": 1, "home_points": 19, "away_goals": 0, "away_behinds": 3, "away_points": 3 },
            { "q": 4, "home_goals": 1, "home_behinds": 2, "home_points": 8, "away_goals": 2, "away_behinds": 2, "away_points": 14 }
        ],
        "player_stats": []
    })
}

/// Player lines for the home side adding up to 48.
pub fn home_player_lines() -> Value {
    json!([
        { "player_name": "Lucas", "goals": 4, "behinds": 2, "points": 26 },
        { "player_name": "Hugo", "goals": 2, "behinds": 3, "points": 15 },
        { "player_name": "Nathan", "goals": 1, "behinds": 1, "points": 7 }
    ])
}

/// Posts a match and returns its id.
pub async fn save_match(app_address: &str, session: &TestSession, body: &Value) -> i64 {
    let response = authed_send(app_address, reqwest::Method::POST, "/matches", session, Some(body)).await;
    assert_eq!(response.status().as_u16(), 201, "match save failed");
    let body: Value = response.json().await.expect("Failed to parse save response");
    body["data"]["id"].as_i64().expect("No match id in response")
}
