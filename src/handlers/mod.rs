// handlers/mod.rs - Two security tiers
//
// Public (no token) → Protected (bearer token, `AuthKader` available)

pub mod protected;
pub mod public;
