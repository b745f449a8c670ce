use actix_web::web;

use crate::handlers::activities;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/activities").route("", web::get().to(activities::get_activities)),
    );
}
