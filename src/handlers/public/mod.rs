// handlers/public/mod.rs - Endpoints reachable without a token
//
// Login, kader self-registration and the health probe.

pub mod auth;
pub mod health;

pub use auth::*;
pub use health::health_get;
