pub mod api;
pub mod app_state;
pub mod config;
pub mod health;
pub mod platform;
pub mod upstream;
