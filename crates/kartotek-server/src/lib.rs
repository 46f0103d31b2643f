pub mod auth;
pub mod config;
pub mod errors;
pub mod relay;
pub mod state;
pub mod web;
