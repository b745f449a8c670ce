use actix_web::web;

use crate::handlers::{overrides, profiles};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/telework")
            .service(
                web::scope("/profiles")
                    .route("", web::post().to(profiles::create_profile))
                    .route("/{user_id}", web::get().to(profiles::get_profile))
                    .route("/{user_id}", web::put().to(profiles::update_profile)),
            )
            .service(
                web::scope("/overrides")
                    .route("", web::post().to(overrides::request_override))
                    .route("", web::get().to(overrides::get_overrides))
                    .route("/validate", web::post().to(overrides::validate_override))
                    .route("/pending", web::get().to(overrides::get_pending_overrides))
                    .route("/cleanup", web::post().to(overrides::cleanup_expired))
                    .route(
                        "/user/{user_id}",
                        web::get().to(overrides::get_user_overrides),
                    )
                    .route("/{id}/approve", web::post().to(overrides::approve_override))
                    .route("/{id}/reject", web::post().to(overrides::reject_override))
                    .route("/{id}", web::delete().to(overrides::delete_override)),
            ),
    );
}
