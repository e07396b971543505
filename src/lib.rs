// src/lib.rs

// Registration, login and session tokens
pub mod auth;

pub mod config;
pub mod i18n;
pub mod server;
pub mod server_config;
