use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use orchestra_be::database::{
    init_database,
    repositories::{
        ActivityRepository, OverrideRepository, TeamRuleRepository, TeleworkProfileRepository,
        UserRepository,
    },
};
use orchestra_be::middleware::RequestId;
use orchestra_be::routes;
use orchestra_be::services::{ActivityLogger, AuthService, TeleworkService};
use orchestra_be::{AppState, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Orchestr'A Telework API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    // Repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let profile_repository = TeleworkProfileRepository::new(pool.clone());
    let override_repository = OverrideRepository::new(pool.clone());
    let team_rule_repository = TeamRuleRepository::new(pool.clone());
    let activity_repository = ActivityRepository::new(pool.clone());

    let auth_service = AuthService::new(user_repository.clone(), config.clone());
    let telework_service = TeleworkService::new(
        user_repository,
        profile_repository,
        override_repository,
        team_rule_repository.clone(),
    );
    let activity_logger = ActivityLogger::new(activity_repository.clone());

    let app_state = web::Data::new(AppState {
        auth_service,
        telework_service,
        activity_logger,
    });
    let team_rule_repo_data = web::Data::new(team_rule_repository);
    let activity_repo_data = web::Data::new(activity_repository);
    let config_data = web::Data::new(config.clone());

    let client_origin = config.client_base_url.clone();
    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(team_rule_repo_data.clone())
            .app_data(activity_repo_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&client_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
