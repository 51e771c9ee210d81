pub mod auth;
pub mod response;

pub use auth::{require_auth, AuthKader};
pub use response::{ApiResponse, ApiResult, Created, Message};
