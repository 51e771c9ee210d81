use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::PgPool;

use crate::database::models::{
    anak::{Anak, AnakRecord},
    ibu::{Ibu, IbuRecord},
    imunisasi::{RiwayatImunisasi, RiwayatImunisasiRecord},
    perkembangan::{Perkembangan, PerkembanganRecord},
};
use crate::database::query_builder::{SelectBuilder, SqlParam, SqlQuery};
use crate::database::repository::fetch_all;
use crate::database::{DatabaseError, Resource};
use crate::error::ApiError;

pub const INVALID_KIND: &str = "Tipe laporan tidak valid.";
pub const INVALID_DATE: &str = "Format tanggal tidak valid (YYYY-MM-DD)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Registered mothers, by registration time.
    Wali,
    /// Registered children, by registration time.
    Anak,
    Perkembangan,
    Imunisasi,
}

impl FromStr for ReportKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wali" => Ok(Self::Wali),
            "anak" => Ok(Self::Anak),
            "perkembangan" => Ok(Self::Perkembangan),
            "imunisasi" => Ok(Self::Imunisasi),
            _ => Err(ApiError::bad_request(INVALID_KIND)),
        }
    }
}

/// Whole-day window: `start` is inclusive, and so is `end` (stored as the following midnight).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end_exclusive: Option<NaiveDate>,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, ApiError> {
        let end = parse_day(end)?;
        Ok(Self {
            start: parse_day(start)?,
            end_exclusive: end.and_then(|d| d.checked_add_signed(Duration::days(1))),
        })
    }
}

// Absent and empty both mean "unbounded".
fn parse_day(raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::bad_request(INVALID_DATE)),
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Report {
    Wali(Vec<IbuRecord>),
    Anak(Vec<AnakRecord>),
    Perkembangan(Vec<PerkembanganRecord>),
    Imunisasi(Vec<RiwayatImunisasiRecord>),
}

impl Report {
    pub fn row_count(&self) -> usize {
        match self {
            Report::Wali(rows) => rows.len(),
            Report::Anak(rows) => rows.len(),
            Report::Perkembangan(rows) => rows.len(),
            Report::Imunisasi(rows) => rows.len(),
        }
    }
}

/// How a date bound is compared against a report's filter column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateColumn {
    Timestamp(&'static str),
    Date(&'static str),
}

impl DateColumn {
    fn name(self) -> &'static str {
        match self {
            DateColumn::Timestamp(name) | DateColumn::Date(name) => name,
        }
    }

    // Timestamps are bounded at midnight UTC of the given day.
    fn bound(self, day: NaiveDate) -> SqlParam {
        match self {
            DateColumn::Timestamp(_) => day.and_time(NaiveTime::MIN).and_utc().into(),
            DateColumn::Date(_) => day.into(),
        }
    }
}

struct ReportShape {
    select: &'static str,
    column: DateColumn,
    order_by: &'static [&'static str],
}

impl ReportKind {
    fn shape(self) -> ReportShape {
        match self {
            ReportKind::Wali => ReportShape {
                select: Ibu::SELECT,
                column: DateColumn::Timestamp("i.created_at"),
                order_by: &["i.created_at DESC", "i.id ASC"],
            },
            ReportKind::Anak => ReportShape {
                select: Anak::SELECT,
                column: DateColumn::Timestamp("a.created_at"),
                order_by: &["a.created_at DESC", "a.id ASC"],
            },
            ReportKind::Perkembangan => ReportShape {
                select: Perkembangan::REPORT_SELECT,
                column: DateColumn::Date("p.tanggal_pemeriksaan"),
                order_by: Perkembangan::ORDER_BY,
            },
            ReportKind::Imunisasi => ReportShape {
                select: RiwayatImunisasi::SELECT,
                column: DateColumn::Date("r.tanggal_imunisasi"),
                order_by: RiwayatImunisasi::ORDER_BY,
            },
        }
    }

    pub fn query(self, range: DateRange) -> SqlQuery {
        let shape = self.shape();
        let mut builder = SelectBuilder::new(shape.select);
        if let Some(start) = range.start {
            builder = builder.gte(shape.column.name(), shape.column.bound(start));
        }
        if let Some(end) = range.end_exclusive {
            builder = builder.lt(shape.column.name(), shape.column.bound(end));
        }
        builder.order_by(shape.order_by).build()
    }
}

pub async fn fetch_report(pool: &PgPool, kind: ReportKind, range: DateRange) -> Result<Report, DatabaseError> {
    let sql = kind.query(range);
    let report = match kind {
        ReportKind::Wali => Report::Wali(fetch_all(pool, &sql).await?),
        ReportKind::Anak => Report::Anak(fetch_all(pool, &sql).await?),
        ReportKind::Perkembangan => Report::Perkembangan(fetch_all(pool, &sql).await?),
        ReportKind::Imunisasi => Report::Imunisasi(fetch_all(pool, &sql).await?),
    };
    Ok(report)
}
