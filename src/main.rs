use std::net::TcpListener;

use footy_score::config::settings::{get_config, get_jwt_settings};
use footy_score::db::pool::{build_pool, run_migrations};
use footy_score::run;
use footy_score::services::AuthService;
use footy_score::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "footy-score".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    let connection_pool = build_pool(&config.database)
        .await
        .expect("Failed to open the database");
    run_migrations(&connection_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Connected to {} database", config.database.backend_name());

    match AuthService::new(connection_pool.clone(), config.auth.clone())
        .ensure_root_admin()
        .await
    {
        Ok(true) => tracing::info!("Root admin account created"),
        Ok(false) => {}
        Err(e) => {
            tracing::error!("Failed to ensure the root admin account: {}", e);
            std::process::exit(1);
        }
    }

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Listening on {}", address);

    run(
        listener,
        connection_pool,
        jwt_settings,
        config.auth,
        config.validation,
    )?.await
}
