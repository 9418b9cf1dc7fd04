use actix_web::web;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod matches;
pub mod players;
pub mod profile;
pub mod registration;
pub mod stats;

use crate::middleware::auth::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(backend_health::backend_health)
        .service(auth::login);

    cfg.configure(matches::init_match_routes)
        .configure(players::init_player_routes)
        .configure(stats::init_stats_routes);

    // Profile routes (require authentication)
    cfg.service(
        web::scope("/profile")
            .wrap(AuthMiddleware)
            .service(profile::get_own_profile)
            .service(profile::update_own_team)
            .service(profile::update_own_password)
    );

    cfg.configure(admin::init_admin_routes);
}
