// handlers/protected/resource.rs - Uniform list/show/create/update/delete
//
// Instantiated once per table in the router, e.g. `get(resource::list::<Ibu>)`.

use std::collections::HashMap;

use axum::extract::{Query, State};
use tracing::info;

use crate::api::{parse_filter_id, JsonBody, PathId};
use crate::database::resource::write_error;
use crate::database::{Repository, Resource, Writable};
use crate::middleware::{ApiResponse, ApiResult, AuthKader, Created, Message};
use crate::types::Operation;
use crate::AppState;

/// GET /api/<entity> - `?search=` plus the table's parent filter, if it has one.
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Vec<R::Record>> {
    let search = params.get("search").map(String::as_str);
    let parent_id = R::PARENT_FILTER
        .and_then(|filter| parse_filter_id(params.get(filter.param).map(String::as_str)));

    let rows = Repository::<R>::new(state.pool).select_any(search, parent_id).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/<entity>/:id
pub async fn show<R: Resource>(State(state): State<AppState>, PathId(id): PathId) -> ApiResult<R::Record> {
    let row = Repository::<R>::new(state.pool).select_404(id).await?;
    Ok(ApiResponse::success(row))
}

/// POST /api/<entity>
pub async fn create<R: Writable>(
    State(state): State<AppState>,
    kader: AuthKader,
    JsonBody(payload): JsonBody<R::Payload>,
) -> ApiResult<Created> {
    let sql = R::insert(payload, kader.id)?;
    let id = Repository::<R>::new(state.pool)
        .insert(sql)
        .await
        .map_err(|e| write_error::<R>(e, Operation::Create))?;

    info!("Kader {} created {} {}", kader.id, R::TABLE, id);
    Ok(Created::new(R::CREATED, id))
}

/// PUT /api/<entity>/:id - full replacement of the editable columns.
pub async fn update<R: Writable>(
    State(state): State<AppState>,
    kader: AuthKader,
    PathId(id): PathId,
    JsonBody(payload): JsonBody<R::Payload>,
) -> ApiResult<Message> {
    let sql = R::update(id, payload, kader.id)?;
    Repository::<R>::new(state.pool)
        .update(sql)
        .await
        .map_err(|e| write_error::<R>(e, Operation::Update))?;

    info!("Kader {} updated {} {}", kader.id, R::TABLE, id);
    Ok(Message::new(R::UPDATED))
}

/// DELETE /api/<entity>/:id - refused with 409 while dependent rows exist.
pub async fn delete<R: Resource>(
    State(state): State<AppState>,
    kader: AuthKader,
    PathId(id): PathId,
) -> ApiResult<Message> {
    Repository::<R>::new(state.pool)
        .delete(id)
        .await
        .map_err(|e| write_error::<R>(e, Operation::Delete))?;

    info!("Kader {} deleted {} {}", kader.id, R::TABLE, id);
    Ok(Message::new(R::DELETED))
}
