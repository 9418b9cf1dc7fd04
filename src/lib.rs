use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use sqlx::SqlitePool;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
mod handlers;
mod middleware;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;
pub mod validation;

use crate::auth::LoginThrottle;
use crate::config::jwt::JwtSettings;
use crate::config::settings::{AuthSettings, ValidationSettings};
use crate::routes::init_routes;

pub fn run(
    listener: TcpListener,
    db_pool: SqlitePool,
    jwt_settings: JwtSettings,
    auth_settings: AuthSettings,
    validation_settings: ValidationSettings,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let db_pool_data = web::Data::new(db_pool);
    let throttle = web::Data::new(LoginThrottle::from_settings(&auth_settings));
    let jwt_settings = web::Data::new(jwt_settings);
    let auth_settings = web::Data::new(auth_settings);
    let validation_settings = web::Data::new(validation_settings);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:8501")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
                http::header::HeaderName::from_static("x-csrf-token"),
            ])
            .expose_headers(vec![http::header::CONTENT_DISPOSITION])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Get a pointer copy and attach it to the application state
            .app_data(db_pool_data.clone())
            .app_data(throttle.clone())
            .app_data(jwt_settings.clone())
            .app_data(auth_settings.clone())
            .app_data(validation_settings.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
