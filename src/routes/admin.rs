use actix_web::web;

use crate::handlers::admin::{audit_handler, match_handler, user_handler};
use crate::middleware::auth::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // User management routes
            .service(
                web::resource("/users")
                    .route(web::get().to(user_handler::get_users))
                    .route(web::post().to(user_handler::create_user))
            )
            .service(
                web::resource("/users/export")
                    .route(web::get().to(user_handler::export_users))
            )
            .service(
                web::resource("/users/{id}")
                    .route(web::delete().to(user_handler::delete_user))
            )
            .service(
                web::resource("/users/{id}/team")
                    .route(web::patch().to(user_handler::update_user_team))
            )
            .service(
                web::resource("/users/{id}/admin")
                    .route(web::patch().to(user_handler::set_admin_flag))
            )
            .service(
                web::resource("/users/{id}/password")
                    .route(web::put().to(user_handler::reset_password))
            )

            // Audit trail
            .service(
                web::resource("/audit")
                    .route(web::get().to(audit_handler::list_audit_logs))
            )

            // Bulk match maintenance
            .service(
                web::resource("/matches")
                    .route(web::delete().to(match_handler::delete_all_matches))
            )
    );
}
