// handlers/protected/kader.rs - Kader profile and password management
//
// List, show and delete use the generic resource handlers. Profile and
// password writes live here because the password column needs hashing.

use axum::extract::State;
use tracing::{info, warn};

use crate::api::{JsonBody, PathId};
use crate::auth::{hash_password, verify_password};
use crate::database::models::kader::{
    find_password_hash, new_password, ChangePassword, Kader, KaderRecord, UpdateKader,
};
use crate::database::resource::write_error;
use crate::database::{Repository, Resource};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthKader, Message};
use crate::types::Operation;
use crate::AppState;

pub const CURRENT_PASSWORD_REQUIRED: &str = "Password lama wajib diisi.";
pub const CURRENT_PASSWORD_WRONG: &str = "Password lama salah.";

/// PUT /api/kader/:id - profile fields only.
pub async fn kader_put(
    State(state): State<AppState>,
    actor: AuthKader,
    PathId(id): PathId,
    JsonBody(body): JsonBody<UpdateKader>,
) -> ApiResult<Message> {
    let fields = body.validate()?;
    Repository::<Kader>::new(state.pool)
        .update(Kader::update(id, fields))
        .await
        .map_err(|e| write_error::<Kader>(e, Operation::Update))?;

    info!("Kader {} updated kader {}", actor.id, id);
    Ok(Message::new(Kader::UPDATED))
}

/// PUT /api/kader/:id/password
pub async fn password_put(
    State(state): State<AppState>,
    actor: AuthKader,
    PathId(id): PathId,
    JsonBody(body): JsonBody<ChangePassword>,
) -> ApiResult<Message> {
    let password = new_password(body.new_password)?;
    let security = &state.config.security;

    if security.require_current_password {
        let current = body
            .current_password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request(CURRENT_PASSWORD_REQUIRED))?;
        let stored = find_password_hash(&state.pool, id)
            .await?
            .ok_or_else(|| ApiError::not_found(Kader::NOT_FOUND))?;

        if !verify_password(current, stored).await? {
            warn!("Kader {} gave a wrong current password for kader {}", actor.id, id);
            return Err(ApiError::bad_request(CURRENT_PASSWORD_WRONG));
        }
    }

    let hash = hash_password(password, security.bcrypt_cost).await?;
    Repository::<Kader>::new(state.pool.clone())
        .update(Kader::set_password(id, hash))
        .await?;

    info!("Kader {} changed the password of kader {}", actor.id, id);
    Ok(Message::new(Kader::PASSWORD_CHANGED))
}

/// GET /api/me - the kader the token was issued to.
pub async fn me_get(State(state): State<AppState>, actor: AuthKader) -> ApiResult<KaderRecord> {
    let kader = Repository::<Kader>::new(state.pool).select_404(actor.id).await?;
    Ok(ApiResponse::success(kader))
}
