use actix_web::web;

use crate::handlers::stats_handler;
use crate::middleware::auth::AuthMiddleware;

pub fn init_stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stats")
            .wrap(AuthMiddleware)
            .service(
                web::resource("/seasons")
                    .route(web::get().to(stats_handler::list_seasons))
            )
            .service(
                web::resource("/seasons/{season}/leaderboard")
                    .route(web::get().to(stats_handler::season_leaderboard))
            )
            .service(
                web::resource("/seasons/{season}/team")
                    .route(web::get().to(stats_handler::team_summary))
            )
            .service(
                web::resource("/summary")
                    .route(web::get().to(stats_handler::matches_summary))
            )
    );
}
