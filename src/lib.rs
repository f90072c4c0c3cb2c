pub mod app;
pub mod auth;
pub mod backend;
pub mod cart;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;
pub mod state;
pub mod types;
pub mod validation;
pub mod views;

pub use app::app;
pub use state::AppState;
