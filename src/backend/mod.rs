// Pharmacy API client

pub mod client;
pub mod error;

pub use client::{BackendClient, BackendResult};
pub use error::BackendError;
