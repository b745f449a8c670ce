pub mod activities;
pub mod auth;
pub mod overrides;
pub mod profiles;
pub mod shared;
pub mod team_rules;
