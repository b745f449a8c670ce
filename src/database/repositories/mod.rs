pub mod activity;
pub mod overrides;
pub mod profile;
pub mod team_rule;
pub mod user;

// Re-export all repositories for easy importing
pub use activity::ActivityRepository;
pub use overrides::OverrideRepository;
pub use profile::TeleworkProfileRepository;
pub use team_rule::TeamRuleRepository;
pub use user::UserRepository;
