use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{date, measurement, optional_nik, required, required_id, ValidationError};
use crate::database::query_builder::SqlQuery;
use crate::database::resource::{ConstraintRule, ParentFilter, Resource, Writable};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnakRecord {
    pub id: i32,
    pub id_ibu: i32,
    pub nama_anak: String,
    pub nik_anak: Option<String>,
    pub tanggal_lahir: NaiveDate,
    pub jenis_kelamin: String,
    pub anak_ke: Option<i32>,
    pub berat_lahir_kg: Option<f64>,
    pub tinggi_lahir_cm: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_ibu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nik_ibu: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnakSimple {
    pub id: i32,
    pub nama_anak: String,
    pub nik_anak: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnakPayload {
    pub id_ibu: i32,
    pub nama_anak: String,
    pub nik_anak: Option<String>,
    pub tanggal_lahir: String,
    pub jenis_kelamin: String,
    pub anak_ke: Option<i32>,
    pub berat_lahir_kg: Option<f64>,
    pub tinggi_lahir_cm: Option<f64>,
}

#[derive(Debug, PartialEq)]
pub struct AnakFields {
    pub id_ibu: i32,
    pub nama_anak: String,
    pub nik_anak: Option<String>,
    pub tanggal_lahir: NaiveDate,
    pub jenis_kelamin: String,
    pub anak_ke: Option<i32>,
    pub berat_lahir_kg: Option<f64>,
    pub tinggi_lahir_cm: Option<f64>,
}

impl AnakPayload {
    pub fn validate(self) -> Result<AnakFields, ValidationError> {
        let jenis_kelamin = match self.jenis_kelamin.trim() {
            "" => return Err(ValidationError::Incomplete),
            sex @ ("L" | "P") => sex.to_string(),
            _ => return Err(ValidationError::Invalid("Jenis kelamin harus 'L' atau 'P'.")),
        };
        if matches!(self.anak_ke, Some(n) if n < 1) {
            return Err(ValidationError::Invalid("Format Anak Ke tidak valid."));
        }

        Ok(AnakFields {
            id_ibu: required_id(self.id_ibu)?,
            nama_anak: required(self.nama_anak)?,
            nik_anak: optional_nik(self.nik_anak)?,
            tanggal_lahir: date(&self.tanggal_lahir, "Format Tanggal Lahir tidak valid (YYYY-MM-DD).")?,
            jenis_kelamin,
            anak_ke: self.anak_ke,
            berat_lahir_kg: measurement(self.berat_lahir_kg, "Format Berat Lahir tidak valid.")?,
            tinggi_lahir_cm: measurement(self.tinggi_lahir_cm, "Format Tinggi Lahir tidak valid.")?,
        })
    }
}

pub struct Anak;

impl Anak {
    pub const SIMPLE_SELECT: &'static str =
        "SELECT id, nama_anak, nik_anak FROM anak ORDER BY nama_anak ASC, id ASC";
}

impl Resource for Anak {
    type Record = AnakRecord;

    const TABLE: &'static str = "anak";
    const ID_COLUMN: &'static str = "a.id";
    const SELECT: &'static str = "SELECT a.id, a.id_ibu, a.nama_anak, a.nik_anak, a.tanggal_lahir, \
         a.jenis_kelamin, a.anak_ke, a.berat_lahir_kg, a.tinggi_lahir_cm, a.created_at, a.updated_at, \
         i.nama_lengkap AS nama_ibu, i.nik AS nik_ibu \
         FROM anak a LEFT JOIN ibu i ON i.id = a.id_ibu";
    const SEARCH_COLUMNS: &'static [&'static str] = &["a.nama_anak", "a.nik_anak", "i.nama_lengkap", "i.nik"];
    const PARENT_FILTER: Option<ParentFilter> = Some(ParentFilter { param: "id_ibu", column: "a.id_ibu" });
    const ORDER_BY: &'static [&'static str] = &["a.nama_anak ASC", "a.id ASC"];

    const NOT_FOUND: &'static str = "Data anak tidak ditemukan.";
    const DELETED: &'static str = "Data anak berhasil dihapus!";
    const DELETE_BLOCKED: &'static str =
        "Anak tidak bisa dihapus karena masih terhubung dengan data perkembangan/imunisasi.";
    const CONSTRAINTS: &'static [ConstraintRule] = &[
        ConstraintRule::not_found("anak_id_ibu_fkey", "ID Ibu tidak ditemukan."),
        ConstraintRule::conflict("anak_nik_anak_key", "NIK anak ini sudah terdaftar.")
            .on_update("NIK anak ini sudah digunakan anak lain."),
    ];
}

impl Writable for Anak {
    type Payload = AnakPayload;

    const CREATED: &'static str = "Data anak berhasil didaftarkan!";
    const UPDATED: &'static str = "Data anak berhasil diperbarui!";

    fn insert(payload: AnakPayload, _actor: i32) -> Result<SqlQuery, ValidationError> {
        let anak = payload.validate()?;
        Ok(bind_fields(
            SqlQuery::new(
                "INSERT INTO anak (id_ibu, nama_anak, nik_anak, tanggal_lahir, jenis_kelamin, anak_ke, \
                 berat_lahir_kg, tinggi_lahir_cm) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
            ),
            anak,
        ))
    }

    fn update(id: i32, payload: AnakPayload, _actor: i32) -> Result<SqlQuery, ValidationError> {
        let anak = payload.validate()?;
        Ok(bind_fields(
            SqlQuery::new(
                "UPDATE anak SET id_ibu = $1, nama_anak = $2, nik_anak = $3, tanggal_lahir = $4, \
                 jenis_kelamin = $5, anak_ke = $6, berat_lahir_kg = $7, tinggi_lahir_cm = $8, \
                 updated_at = NOW() WHERE id = $9",
            ),
            anak,
        )
        .bind(id))
    }
}

fn bind_fields(sql: SqlQuery, anak: AnakFields) -> SqlQuery {
    sql.bind(anak.id_ibu)
        .bind(anak.nama_anak)
        .bind(anak.nik_anak)
        .bind(anak.tanggal_lahir)
        .bind(anak.jenis_kelamin)
        .bind(anak.anak_ke)
        .bind(anak.berat_lahir_kg)
        .bind(anak.tinggi_lahir_cm)
}
