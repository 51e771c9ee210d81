use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{date, optional, required, required_id, ValidationError};
use crate::database::query_builder::SqlQuery;
use crate::database::resource::{ConstraintRule, ParentFilter, Resource, Writable};

// Master catalog

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MasterImunisasiRecord {
    pub id: i32,
    pub nama_imunisasi: String,
    pub usia_ideal_bulan: i32,
    pub deskripsi: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MasterImunisasiSimple {
    pub id: i32,
    pub nama_imunisasi: String,
    pub usia_ideal_bulan: i32,
}

#[derive(Debug, Deserialize)]
pub struct MasterImunisasiPayload {
    pub nama_imunisasi: String,
    #[serde(default)]
    pub usia_ideal_bulan: i32,
    pub deskripsi: Option<String>,
}

impl MasterImunisasiPayload {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.usia_ideal_bulan < 0 {
            return Err(ValidationError::Invalid("Usia Ideal tidak boleh negatif."));
        }
        Ok(Self {
            nama_imunisasi: required(self.nama_imunisasi)?,
            usia_ideal_bulan: self.usia_ideal_bulan,
            deskripsi: optional(self.deskripsi),
        })
    }
}

pub struct MasterImunisasi;

impl MasterImunisasi {
    pub const SIMPLE_SELECT: &'static str = "SELECT id, nama_imunisasi, usia_ideal_bulan FROM master_imunisasi \
         ORDER BY usia_ideal_bulan ASC, nama_imunisasi ASC, id ASC";
}

impl Resource for MasterImunisasi {
    type Record = MasterImunisasiRecord;

    const TABLE: &'static str = "master_imunisasi";
    const ID_COLUMN: &'static str = "m.id";
    const SELECT: &'static str = "SELECT m.id, m.nama_imunisasi, m.usia_ideal_bulan, m.deskripsi, \
         m.created_at, m.updated_at FROM master_imunisasi m";
    const SEARCH_COLUMNS: &'static [&'static str] = &["m.nama_imunisasi", "m.deskripsi"];
    const ORDER_BY: &'static [&'static str] = &["m.usia_ideal_bulan ASC", "m.nama_imunisasi ASC", "m.id ASC"];

    const NOT_FOUND: &'static str = "Master imunisasi tidak ditemukan.";
    const DELETED: &'static str = "Master imunisasi berhasil dihapus!";
    const DELETE_BLOCKED: &'static str = "Master imunisasi tidak bisa dihapus karena terhubung dengan riwayat.";
    const CONSTRAINTS: &'static [ConstraintRule] = &[ConstraintRule::conflict(
        "master_imunisasi_nama_imunisasi_key",
        "Nama imunisasi ini sudah ada.",
    )
    .on_update("Nama imunisasi ini sudah digunakan.")];
}

impl Writable for MasterImunisasi {
    type Payload = MasterImunisasiPayload;

    const CREATED: &'static str = "Master imunisasi berhasil ditambahkan!";
    const UPDATED: &'static str = "Master imunisasi berhasil diperbarui!";

    fn insert(payload: MasterImunisasiPayload, _actor: i32) -> Result<SqlQuery, ValidationError> {
        let master = payload.validate()?;
        Ok(SqlQuery::new(
            "INSERT INTO master_imunisasi (nama_imunisasi, usia_ideal_bulan, deskripsi) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(master.nama_imunisasi)
        .bind(master.usia_ideal_bulan)
        .bind(master.deskripsi))
    }

    fn update(id: i32, payload: MasterImunisasiPayload, _actor: i32) -> Result<SqlQuery, ValidationError> {
        let master = payload.validate()?;
        Ok(SqlQuery::new(
            "UPDATE master_imunisasi SET nama_imunisasi = $1, usia_ideal_bulan = $2, deskripsi = $3, \
             updated_at = NOW() WHERE id = $4",
        )
        .bind(master.nama_imunisasi)
        .bind(master.usia_ideal_bulan)
        .bind(master.deskripsi)
        .bind(id))
    }
}

// Immunization history

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RiwayatImunisasiRecord {
    pub id: i32,
    pub id_anak: i32,
    pub id_master_imunisasi: i32,
    pub tanggal_imunisasi: NaiveDate,
    pub id_kader_pencatat: i32,
    pub id_kader_updater: Option<i32>,
    pub catatan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_anak: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nik_anak: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_imunisasi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_kader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nama_kader_updater: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RiwayatImunisasiPayload {
    pub id_anak: i32,
    pub id_master_imunisasi: i32,
    pub tanggal_imunisasi: String,
    pub catatan: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct RiwayatFields {
    pub id_anak: i32,
    pub id_master_imunisasi: i32,
    pub tanggal_imunisasi: NaiveDate,
    pub catatan: Option<String>,
}

impl RiwayatImunisasiPayload {
    pub fn validate(self) -> Result<RiwayatFields, ValidationError> {
        Ok(RiwayatFields {
            id_anak: required_id(self.id_anak)?,
            id_master_imunisasi: required_id(self.id_master_imunisasi)?,
            tanggal_imunisasi: date(
                &self.tanggal_imunisasi,
                "Format Tanggal Imunisasi tidak valid (YYYY-MM-DD).",
            )?,
            catatan: optional(self.catatan),
        })
    }
}

pub struct RiwayatImunisasi;

impl Resource for RiwayatImunisasi {
    type Record = RiwayatImunisasiRecord;

    const TABLE: &'static str = "riwayat_imunisasi";
    const ID_COLUMN: &'static str = "r.id";
    const SELECT: &'static str = "SELECT r.id, r.id_anak, r.id_master_imunisasi, r.tanggal_imunisasi, \
         r.id_kader_pencatat, r.id_kader_updater, r.catatan, r.created_at, r.updated_at, \
         a.nama_anak, a.nik_anak, m.nama_imunisasi, \
         k.nama_lengkap AS nama_kader, ku.nama_lengkap AS nama_kader_updater \
         FROM riwayat_imunisasi r \
         LEFT JOIN anak a ON a.id = r.id_anak \
         LEFT JOIN master_imunisasi m ON m.id = r.id_master_imunisasi \
         LEFT JOIN kader k ON k.id = r.id_kader_pencatat \
         LEFT JOIN kader ku ON ku.id = r.id_kader_updater";
    const SEARCH_COLUMNS: &'static [&'static str] = &["a.nama_anak", "a.nik_anak", "m.nama_imunisasi"];
    const PARENT_FILTER: Option<ParentFilter> = Some(ParentFilter { param: "id_anak", column: "r.id_anak" });
    const ORDER_BY: &'static [&'static str] = &["r.tanggal_imunisasi DESC", "a.nama_anak ASC", "r.id ASC"];

    const NOT_FOUND: &'static str = "Riwayat imunisasi tidak ditemukan.";
    const DELETED: &'static str = "Riwayat imunisasi berhasil dihapus!";
    const DELETE_BLOCKED: &'static str = "Riwayat imunisasi masih terhubung dengan data lain.";
    const CONSTRAINTS: &'static [ConstraintRule] = &[
        ConstraintRule::not_found("riwayat_imunisasi_id_anak_fkey", "ID Anak tidak ditemukan."),
        ConstraintRule::not_found(
            "riwayat_imunisasi_id_master_imunisasi_fkey",
            "ID Master Imunisasi tidak ditemukan.",
        ),
        ConstraintRule::not_found("riwayat_imunisasi_id_kader_pencatat_fkey", "Kader tidak ditemukan."),
        ConstraintRule::not_found("riwayat_imunisasi_id_kader_updater_fkey", "Kader tidak ditemukan."),
    ];
}

impl Writable for RiwayatImunisasi {
    type Payload = RiwayatImunisasiPayload;

    const CREATED: &'static str = "Riwayat imunisasi berhasil dicatat!";
    const UPDATED: &'static str = "Riwayat imunisasi berhasil diperbarui!";

    fn insert(payload: RiwayatImunisasiPayload, actor: i32) -> Result<SqlQuery, ValidationError> {
        let riwayat = payload.validate()?;
        Ok(SqlQuery::new(
            "INSERT INTO riwayat_imunisasi (id_anak, id_master_imunisasi, tanggal_imunisasi, catatan, \
             id_kader_pencatat) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(riwayat.id_anak)
        .bind(riwayat.id_master_imunisasi)
        .bind(riwayat.tanggal_imunisasi)
        .bind(riwayat.catatan)
        .bind(actor))
    }

    fn update(id: i32, payload: RiwayatImunisasiPayload, actor: i32) -> Result<SqlQuery, ValidationError> {
        let riwayat = payload.validate()?;
        Ok(SqlQuery::new(
            "UPDATE riwayat_imunisasi SET id_anak = $1, id_master_imunisasi = $2, tanggal_imunisasi = $3, \
             catatan = $4, id_kader_updater = $5, updated_at = NOW() WHERE id = $6",
        )
        .bind(riwayat.id_anak)
        .bind(riwayat.id_master_imunisasi)
        .bind(riwayat.tanggal_imunisasi)
        .bind(riwayat.catatan)
        .bind(actor)
        .bind(id))
    }
}
