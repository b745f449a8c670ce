use actix_web::web;

use crate::handlers::team_rules;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/telework/rules")
            .route("", web::post().to(team_rules::create_rule))
            .route("", web::get().to(team_rules::get_rules))
            .route("/{id}", web::get().to(team_rules::get_rule))
            .route("/{id}", web::put().to(team_rules::update_rule))
            .route("/{id}", web::delete().to(team_rules::delete_rule)),
    );
}
