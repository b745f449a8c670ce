pub mod activity_logger;
pub mod auth;
pub mod telework;

pub use activity_logger::ActivityLogger;
pub use auth::AuthService;
pub use telework::TeleworkService;
