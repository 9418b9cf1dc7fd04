use actix_web::web;

use crate::handlers::player_handler;
use crate::middleware::auth::AuthMiddleware;

pub fn init_player_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/players")
            .wrap(AuthMiddleware)
            .service(
                web::resource("")
                    .route(web::get().to(player_handler::list_players))
                    .route(web::post().to(player_handler::upsert_players))
            )
            .service(
                web::resource("/search")
                    .route(web::get().to(player_handler::search_players))
            )
            .service(
                web::resource("/count")
                    .route(web::get().to(player_handler::count_players))
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(player_handler::get_player))
                    .route(web::patch().to(player_handler::rename_player))
                    .route(web::delete().to(player_handler::delete_player))
            )
            .service(
                web::resource("/{id}/deactivate")
                    .route(web::post().to(player_handler::deactivate_player))
            )
            .service(
                web::resource("/{id}/reactivate")
                    .route(web::post().to(player_handler::reactivate_player))
            )
            .service(
                web::resource("/{id}/matches")
                    .route(web::get().to(player_handler::player_matches))
            )
            .service(
                web::resource("/{id}/totals")
                    .route(web::get().to(player_handler::player_totals))
            )
    );
}
