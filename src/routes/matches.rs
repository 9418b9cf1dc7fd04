use actix_web::web;

use crate::handlers::match_handler;
use crate::middleware::auth::AuthMiddleware;

pub fn init_match_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/matches")
            .wrap(AuthMiddleware)
            .service(
                web::resource("")
                    .route(web::get().to(match_handler::list_matches))
                    .route(web::post().to(match_handler::create_match))
            )
            // Fixed segments before /{id}
            .service(
                web::resource("/validate")
                    .route(web::post().to(match_handler::validate_match))
            )
            .service(
                web::resource("/export")
                    .route(web::get().to(match_handler::export_matches))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(match_handler::get_match))
                    .route(web::put().to(match_handler::update_match))
                    .route(web::delete().to(match_handler::delete_match))
            )
            .service(
                web::resource("/{id}/quarters")
                    .route(web::get().to(match_handler::get_quarters))
            )
            .service(
                web::resource("/{id}/player_stats")
                    .route(web::get().to(match_handler::get_player_stats))
                    .route(web::put().to(match_handler::replace_player_stats))
            )
            .service(
                web::resource("/{id}/export")
                    .route(web::get().to(match_handler::export_match))
            )
    );
}
