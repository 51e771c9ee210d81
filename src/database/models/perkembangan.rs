use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{date, measurement, optional, required_id, ValidationError};
use crate::database::query_builder::SqlQuery;
use crate::database::resource::{ConstraintRule, ParentFilter, Resource, Writable};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PerkembanganRecord {
    pub id: i32,
    pub id_anak: i32,
    pub tanggal_pemeriksaan: NaiveDate,
    pub bb_kg: Option<f64>,
    pub tb_cm: Option<f64>,
    pub lk_cm: Option<f64>,
    pub ll_cm: Option<f64>,
    pub status_gizi: Option<String>,
    pub saran: Option<String>,
    pub id_kader_pencatat: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_anak: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nik_anak: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_ibu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_kader: Option<String>,
    /// Only selected by the report projection.
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nik_ibu: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PerkembanganPayload {
    pub id_anak: i32,
    pub tanggal_pemeriksaan: String,
    pub bb_kg: Option<f64>,
    pub tb_cm: Option<f64>,
    pub lk_cm: Option<f64>,
    pub ll_cm: Option<f64>,
    pub status_gizi: Option<String>,
    pub saran: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct PerkembanganFields {
    pub id_anak: i32,
    pub tanggal_pemeriksaan: NaiveDate,
    pub bb_kg: Option<f64>,
    pub tb_cm: Option<f64>,
    pub lk_cm: Option<f64>,
    pub ll_cm: Option<f64>,
    pub status_gizi: Option<String>,
    pub saran: Option<String>,
}

const MEASUREMENT_INVALID: &str = "Nilai pengukuran tidak boleh negatif.";

impl PerkembanganPayload {
    pub fn validate(self) -> Result<PerkembanganFields, ValidationError> {
        Ok(PerkembanganFields {
            id_anak: required_id(self.id_anak)?,
            tanggal_pemeriksaan: date(
                &self.tanggal_pemeriksaan,
                "Format Tanggal Pemeriksaan tidak valid. Gunakan YYYY-MM-DD.",
            )?,
            bb_kg: measurement(self.bb_kg, MEASUREMENT_INVALID)?,
            tb_cm: measurement(self.tb_cm, MEASUREMENT_INVALID)?,
            lk_cm: measurement(self.lk_cm, MEASUREMENT_INVALID)?,
            ll_cm: measurement(self.ll_cm, MEASUREMENT_INVALID)?,
            status_gizi: optional(self.status_gizi),
            saran: optional(self.saran),
        })
    }
}

pub struct Perkembangan;

// The list and report projections share everything but the extra columns.
macro_rules! perkembangan_select {
    ($extra:literal) => {
        concat!(
            "SELECT p.id, p.id_anak, p.tanggal_pemeriksaan, p.bb_kg, p.tb_cm, p.lk_cm, ",
            "p.ll_cm, p.status_gizi, p.saran, p.id_kader_pencatat, p.created_at, p.updated_at, ",
            "a.nama_anak, a.nik_anak, i.nama_lengkap AS nama_ibu, k.nama_lengkap AS nama_kader",
            $extra,
            " FROM perkembangan p ",
            "LEFT JOIN anak a ON a.id = p.id_anak ",
            "LEFT JOIN ibu i ON i.id = a.id_ibu ",
            "LEFT JOIN kader k ON k.id = p.id_kader_pencatat"
        )
    };
}

impl Perkembangan {
    /// List projection plus the mother's NIK.
    pub const REPORT_SELECT: &'static str = perkembangan_select!(", i.nik AS nik_ibu");
}

impl Resource for Perkembangan {
    type Record = PerkembanganRecord;

    const TABLE: &'static str = "perkembangan";
    const ID_COLUMN: &'static str = "p.id";
    const SELECT: &'static str = perkembangan_select!("");
    const SEARCH_COLUMNS: &'static [&'static str] =
        &["a.nama_anak", "a.nik_anak", "k.nama_lengkap", "i.nama_lengkap"];
    const PARENT_FILTER: Option<ParentFilter> = Some(ParentFilter { param: "id_anak", column: "p.id_anak" });
    const ORDER_BY: &'static [&'static str] = &["p.tanggal_pemeriksaan DESC", "a.nama_anak ASC", "p.id ASC"];

    const NOT_FOUND: &'static str = "Data perkembangan tidak ditemukan.";
    const DELETED: &'static str = "Data perkembangan berhasil dihapus!";
    const DELETE_BLOCKED: &'static str = "Data perkembangan masih terhubung dengan data lain.";
    const CONSTRAINTS: &'static [ConstraintRule] = &[
        ConstraintRule::not_found("perkembangan_id_anak_fkey", "ID Anak tidak ditemukan."),
        ConstraintRule::not_found("perkembangan_id_kader_pencatat_fkey", "Kader tidak ditemukan."),
    ];
}

impl Writable for Perkembangan {
    type Payload = PerkembanganPayload;

    const CREATED: &'static str = "Data perkembangan berhasil dicatat!";
    const UPDATED: &'static str = "Data perkembangan berhasil diperbarui!";

    fn insert(payload: PerkembanganPayload, actor: i32) -> Result<SqlQuery, ValidationError> {
        let fields = payload.validate()?;
        Ok(bind_fields(
            SqlQuery::new(
                "INSERT INTO perkembangan (id_anak, tanggal_pemeriksaan, bb_kg, tb_cm, lk_cm, ll_cm, \
                 status_gizi, saran, id_kader_pencatat) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 RETURNING id",
            ),
            fields,
        )
        .bind(actor))
    }

    // The recording kader stays the one who created the checkup.
    fn update(id: i32, payload: PerkembanganPayload, _actor: i32) -> Result<SqlQuery, ValidationError> {
        let fields = payload.validate()?;
        Ok(bind_fields(
            SqlQuery::new(
                "UPDATE perkembangan SET id_anak = $1, tanggal_pemeriksaan = $2, bb_kg = $3, tb_cm = $4, \
                 lk_cm = $5, ll_cm = $6, status_gizi = $7, saran = $8, updated_at = NOW() WHERE id = $9",
            ),
            fields,
        )
        .bind(id))
    }
}

fn bind_fields(sql: SqlQuery, fields: PerkembanganFields) -> SqlQuery {
    sql.bind(fields.id_anak)
        .bind(fields.tanggal_pemeriksaan)
        .bind(fields.bb_kg)
        .bind(fields.tb_cm)
        .bind(fields.lk_cm)
        .bind(fields.ll_cm)
        .bind(fields.status_gizi)
        .bind(fields.saran)
}
