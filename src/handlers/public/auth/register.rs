// handlers/public/auth/register.rs - POST /api/kader

use axum::extract::State;
use tracing::info;

use crate::api::JsonBody;
use crate::auth::hash_password;
use crate::database::models::kader::{Kader, RegisterKader};
use crate::database::resource::write_error;
use crate::database::Repository;
use crate::middleware::{ApiResult, Created};
use crate::types::Operation;
use crate::AppState;

/// Open registration for a new kader account. Validation runs before the password is hashed.
pub async fn register_post(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterKader>,
) -> ApiResult<Created> {
    let (fields, password) = body.validate()?;
    let username = fields.username.clone();

    let hash = hash_password(password, state.config.security.bcrypt_cost).await?;
    let id = Repository::<Kader>::new(state.pool)
        .insert(Kader::insert(fields, hash))
        .await
        .map_err(|e| write_error::<Kader>(e, Operation::Create))?;

    info!("Registered kader {} ({})", id, username);
    Ok(Created::new(Kader::REGISTERED, id))
}
