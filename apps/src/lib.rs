pub mod config;
pub mod error;
pub mod fixtures;
pub mod manifest;
pub mod routes;

pub use routes::{router, AppState};
