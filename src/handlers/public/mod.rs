// handlers/public/mod.rs - pages reachable without a session
//
// Landing page, login/logout, client sign-up and the health probe.

pub mod auth;
pub mod cadastro;
pub mod health;

pub use auth::*;
pub use cadastro::*;
pub use health::*;
