// handlers/protected/lookup.rs - Compact pick lists for form dropdowns

use axum::extract::State;

use crate::database::models::{
    anak::{Anak, AnakSimple},
    ibu::{Ibu, IbuOption},
    imunisasi::{MasterImunisasi, MasterImunisasiSimple},
};
use crate::database::query_builder::SqlQuery;
use crate::database::repository::fetch_all;
use crate::middleware::{ApiResponse, ApiResult};
use crate::AppState;

/// GET /api/ibu/simple
pub async fn ibu_simple(State(state): State<AppState>) -> ApiResult<Vec<IbuOption>> {
    let rows = fetch_all(&state.pool, &SqlQuery::new(Ibu::SIMPLE_SELECT)).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/anak/simple
pub async fn anak_simple(State(state): State<AppState>) -> ApiResult<Vec<AnakSimple>> {
    let rows = fetch_all(&state.pool, &SqlQuery::new(Anak::SIMPLE_SELECT)).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/master-imunisasi/simple
pub async fn master_imunisasi_simple(
    State(state): State<AppState>,
) -> ApiResult<Vec<MasterImunisasiSimple>> {
    let rows = fetch_all(&state.pool, &SqlQuery::new(MasterImunisasi::SIMPLE_SELECT)).await?;
    Ok(ApiResponse::success(rows))
}
