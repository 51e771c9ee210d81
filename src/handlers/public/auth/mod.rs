// handlers/public/auth/mod.rs - Token acquisition and account registration

pub mod login; // POST /api/login
pub mod register; // POST /api/kader

pub use login::login_post;
pub use register::register_post;
