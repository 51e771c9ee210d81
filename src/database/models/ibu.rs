use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{nik, required, ValidationError};
use crate::database::query_builder::SqlQuery;
use crate::database::resource::{ConstraintRule, Resource, Writable};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IbuRecord {
    pub id: i32,
    pub nama_lengkap: String,
    pub nik: String,
    pub no_telepon: Option<String>,
    pub alamat: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_kader_pendaftar: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Picker entry for forms that attach a child to a mother.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IbuOption {
    pub id: i32,
    pub nama_lengkap: String,
}

#[derive(Debug, Deserialize)]
pub struct IbuPayload {
    pub nama_lengkap: String,
    pub nik: String,
    pub no_telepon: String,
    pub alamat: String,
}

impl IbuPayload {
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            nama_lengkap: required(self.nama_lengkap)?,
            nik: nik(self.nik)?,
            no_telepon: required(self.no_telepon)?,
            alamat: required(self.alamat)?,
        })
    }
}

pub struct Ibu;

impl Ibu {
    pub const SIMPLE_SELECT: &'static str =
        "SELECT id, nama_lengkap FROM ibu ORDER BY nama_lengkap ASC, id ASC";
}

impl Resource for Ibu {
    type Record = IbuRecord;

    const TABLE: &'static str = "ibu";
    const ID_COLUMN: &'static str = "i.id";
    const SELECT: &'static str = "SELECT i.id, i.nama_lengkap, i.nik, i.no_telepon, i.alamat, \
         i.id_kader_pendaftar, i.created_at, i.updated_at FROM ibu i";
    const SEARCH_COLUMNS: &'static [&'static str] = &["i.nama_lengkap", "i.nik"];
    const ORDER_BY: &'static [&'static str] = &["i.nama_lengkap ASC", "i.id ASC"];

    const NOT_FOUND: &'static str = "Ibu tidak ditemukan.";
    const DELETED: &'static str = "Data ibu berhasil dihapus!";
    const DELETE_BLOCKED: &'static str = "Ibu tidak bisa dihapus karena masih terhubung dengan data anak.";
    const CONSTRAINTS: &'static [ConstraintRule] = &[
        ConstraintRule::conflict("ibu_nik_key", "NIK ini sudah terdaftar.")
            .on_update("NIK ini sudah terdaftar pada ibu lain."),
        ConstraintRule::not_found("ibu_id_kader_pendaftar_fkey", "Kader tidak ditemukan."),
    ];
}

impl Writable for Ibu {
    type Payload = IbuPayload;

    const CREATED: &'static str = "Data ibu berhasil didaftarkan!";
    const UPDATED: &'static str = "Data ibu berhasil diperbarui!";

    fn insert(payload: IbuPayload, actor: i32) -> Result<SqlQuery, ValidationError> {
        let ibu = payload.validate()?;
        Ok(SqlQuery::new(
            "INSERT INTO ibu (nama_lengkap, nik, no_telepon, alamat, id_kader_pendaftar) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(ibu.nama_lengkap)
        .bind(ibu.nik)
        .bind(ibu.no_telepon)
        .bind(ibu.alamat)
        .bind(actor))
    }

    // The registering kader is kept as-is on update.
    fn update(id: i32, payload: IbuPayload, _actor: i32) -> Result<SqlQuery, ValidationError> {
        let ibu = payload.validate()?;
        Ok(SqlQuery::new(
            "UPDATE ibu SET nama_lengkap = $1, nik = $2, no_telepon = $3, alamat = $4, \
             updated_at = NOW() WHERE id = $5",
        )
        .bind(ibu.nama_lengkap)
        .bind(ibu.nik)
        .bind(ibu.no_telepon)
        .bind(ibu.alamat)
        .bind(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::query_builder::SqlParam;

    fn payload(nik: &str) -> IbuPayload {
        IbuPayload {
            nama_lengkap: "Siti Aminah".into(),
            nik: nik.into(),
            no_telepon: "081234567890".into(),
            alamat: "Jl. Melati 1".into(),
        }
    }

    #[test]
    fn insert_records_registering_kader() {
        let sql = Ibu::insert(payload("3201010101010001"), 5).unwrap();
        assert_eq!(sql.params.len(), 5);
        assert_eq!(sql.params[4], SqlParam::Int(Some(5)));
    }

    #[test]
    fn nik_length_boundary() {
        assert!(Ibu::insert(payload("1234567890123456"), 1).is_ok());
        assert_eq!(
            Ibu::insert(payload("12345678901234567"), 1).unwrap_err(),
            ValidationError::NikTooLong
        );
    }

    #[test]
    fn missing_address_is_incomplete() {
        let mut p = payload("3201");
        p.alamat = "  ".into();
        assert_eq!(Ibu::update(1, p, 1).unwrap_err(), ValidationError::Incomplete);
    }
}
