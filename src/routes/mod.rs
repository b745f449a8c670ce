use actix_web::web;

pub mod activities;
pub mod auth;
pub mod team_rules;
pub mod telework;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(auth::configure)
            // rules first: its scope shares the /telework prefix
            .configure(team_rules::configure)
            .configure(telework::configure)
            .configure(activities::configure),
    );
}
