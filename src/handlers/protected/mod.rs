// handlers/protected/mod.rs - pages for any logged-in user
//
// Catalog, cart, simulated checkout and the user's own purchases. Routes are
// wrapped by the guard with `Access::Authenticated`, so every handler gets a
// `CurrentSession` extension.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod compras;

pub use cart::*;
pub use catalog::*;
pub use checkout::*;
pub use compras::*;
