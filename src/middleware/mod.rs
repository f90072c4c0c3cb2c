pub mod guard;

pub use guard::{check_access, require, Access, Denied, EndSession, ADMIN_ONLY, STAFF};
