// handlers/protected/laporan.rs - GET /api/laporan/:tipe?start=&end=

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::info;

use crate::middleware::{ApiResponse, ApiResult, AuthKader};
use crate::services::{fetch_report, DateRange, Report, ReportKind};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

pub async fn laporan_get(
    State(state): State<AppState>,
    actor: AuthKader,
    Path(tipe): Path<String>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Report> {
    // Dates are checked before the kind, so a bad range wins over an unknown tipe.
    let range = DateRange::parse(query.start.as_deref(), query.end.as_deref())?;
    let kind: ReportKind = tipe.parse()?;

    let report = fetch_report(&state.pool, kind, range).await?;
    info!("Kader {} pulled {:?} report: {} rows", actor.id, kind, report.row_count());
    Ok(ApiResponse::success(report))
}
