// handlers/public/auth/login.rs - POST /api/login

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::JsonBody;
use crate::auth::{verify_password, verify_unknown_user};
use crate::database::models::kader::find_credentials_by_username;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

pub const MISSING_CREDENTIALS: &str = "Username dan Password wajib diisi";
pub const BAD_CREDENTIALS: &str = "Username atau Password salah";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i32,
    pub nama_lengkap: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: LoginUser,
    pub token: String,
}

/// Exchange username and password for a session token.
///
/// Unknown usernames and wrong passwords get the same 401 so the response
/// never reveals which accounts exist.
pub async fn login_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::bad_request(MISSING_CREDENTIALS));
    }

    let kader = match find_credentials_by_username(&state.pool, &body.username).await? {
        Some(kader) => kader,
        None => {
            verify_unknown_user(body.password, state.config.security.bcrypt_cost).await;
            info!("Login failed: unknown username {:?}", body.username);
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
    };

    if !verify_password(body.password, kader.password).await? {
        warn!("Login failed: wrong password for kader {}", kader.id);
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let token = state.tokens.issue(kader.id)?;
    info!("Kader {} ({}) logged in", kader.id, kader.username);

    Ok(ApiResponse::success(LoginResponse {
        message: "Login berhasil!",
        user: LoginUser {
            id: kader.id,
            nama_lengkap: kader.nama_lengkap,
            username: kader.username,
        },
        token,
    }))
}
