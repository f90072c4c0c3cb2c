// handlers/elevated/mod.rs - back office pages (staff only)
//
// Security Level: ADMIN or EMPLOY role
// Employee and administrator management, and product deletion, are
// routed behind the ADMIN-only guard.

pub mod home;
pub mod pessoas;
pub mod produtos;
pub mod vendas;

pub use home::*;
pub use pessoas::*;
pub use produtos::*;
pub use vendas::*;
