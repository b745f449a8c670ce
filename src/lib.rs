pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;
pub use services::{ActivityLogger, AuthService, TeleworkService};

pub struct AppState {
    pub auth_service: AuthService,
    pub telework_service: TeleworkService,
    pub activity_logger: ActivityLogger,
}
