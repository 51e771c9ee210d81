use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use super::{optional, optional_nik, required, ValidationError};
use crate::database::manager::DatabaseError;
use crate::database::query_builder::SqlQuery;
use crate::database::resource::{ConstraintRule, Resource};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Public view of a kader account. The password hash is never selected.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct KaderRecord {
    pub id: i32,
    pub nama_lengkap: String,
    pub nik: Option<String>,
    pub no_telepon: Option<String>,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct KaderCredentials {
    pub id: i32,
    pub nama_lengkap: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterKader {
    pub nama_lengkap: String,
    pub nik: Option<String>,
    pub no_telepon: Option<String>,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateKader {
    pub nama_lengkap: String,
    pub nik: Option<String>,
    pub no_telepon: Option<String>,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePassword {
    pub new_password: String,
    pub current_password: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct KaderFields {
    pub nama_lengkap: String,
    pub nik: Option<String>,
    pub no_telepon: Option<String>,
    pub username: String,
}

impl KaderFields {
    fn validate(
        nama_lengkap: String,
        nik: Option<String>,
        no_telepon: Option<String>,
        username: String,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            nama_lengkap: required(nama_lengkap)?,
            nik: optional_nik(nik)?,
            no_telepon: optional(no_telepon),
            username: required(username)?,
        })
    }
}

impl RegisterKader {
    /// Returns the validated profile plus the plaintext password still to be hashed.
    pub fn validate(self) -> Result<(KaderFields, String), ValidationError> {
        let fields = KaderFields::validate(self.nama_lengkap, self.nik, self.no_telepon, self.username)?;
        let password = password_rules(
            self.password,
            "Password wajib diisi.",
            "Password minimal 6 karakter.",
        )?;
        Ok((fields, password))
    }
}

impl UpdateKader {
    pub fn validate(self) -> Result<KaderFields, ValidationError> {
        KaderFields::validate(self.nama_lengkap, self.nik, self.no_telepon, self.username)
    }
}

pub fn new_password(password: String) -> Result<String, ValidationError> {
    password_rules(password, "Password baru wajib diisi.", "Password baru minimal 6 karakter.")
}

// Passwords are kept verbatim, never trimmed.
fn password_rules(
    password: String,
    missing: &'static str,
    too_short: &'static str,
) -> Result<String, ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Invalid(missing));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::Invalid(too_short));
    }
    Ok(password)
}

pub struct Kader;

impl Resource for Kader {
    type Record = KaderRecord;

    const TABLE: &'static str = "kader";
    const ID_COLUMN: &'static str = "k.id";
    const SELECT: &'static str =
        "SELECT k.id, k.nama_lengkap, k.nik, k.no_telepon, k.username, k.created_at, k.updated_at FROM kader k";
    const SEARCH_COLUMNS: &'static [&'static str] = &["k.nama_lengkap", "k.nik", "k.username"];
    const ORDER_BY: &'static [&'static str] = &["k.nama_lengkap ASC", "k.id ASC"];

    const NOT_FOUND: &'static str = "Kader tidak ditemukan.";
    const DELETED: &'static str = "Data kader berhasil dihapus!";
    const DELETE_BLOCKED: &'static str =
        "Kader tidak bisa dihapus karena masih terhubung dengan data lain (misal: data ibu/perkembangan).";
    const CONSTRAINTS: &'static [ConstraintRule] = &[
        ConstraintRule::conflict("kader_username_key", "Username ini sudah digunakan.")
            .on_update("Username ini sudah digunakan kader lain."),
        ConstraintRule::conflict("kader_nik_key", "NIK ini sudah terdaftar.")
            .on_update("NIK ini sudah digunakan kader lain."),
    ];
}

impl Kader {
    pub const REGISTERED: &'static str = "Kader baru berhasil didaftarkan!";
    pub const UPDATED: &'static str = "Data kader berhasil diperbarui!";
    pub const PASSWORD_CHANGED: &'static str = "Password berhasil diperbarui!";

    pub fn insert(fields: KaderFields, password_hash: String) -> SqlQuery {
        SqlQuery::new(
            "INSERT INTO kader (nama_lengkap, nik, no_telepon, username, password) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(fields.nama_lengkap)
        .bind(fields.nik)
        .bind(fields.no_telepon)
        .bind(fields.username)
        .bind(password_hash)
    }

    pub fn update(id: i32, fields: KaderFields) -> SqlQuery {
        SqlQuery::new(
            "UPDATE kader SET nama_lengkap = $1, nik = $2, no_telepon = $3, username = $4, \
             updated_at = NOW() WHERE id = $5",
        )
        .bind(fields.nama_lengkap)
        .bind(fields.nik)
        .bind(fields.no_telepon)
        .bind(fields.username)
        .bind(id)
    }

    pub fn set_password(id: i32, password_hash: String) -> SqlQuery {
        SqlQuery::new("UPDATE kader SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
    }
}

/// Exact, case-sensitive username lookup used by login.
pub async fn find_credentials_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<KaderCredentials>, DatabaseError> {
    let kader = sqlx::query_as::<_, KaderCredentials>(
        "SELECT id, nama_lengkap, username, password FROM kader WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(kader)
}

pub async fn find_password_hash(pool: &PgPool, id: i32) -> Result<Option<String>, DatabaseError> {
    let hash = sqlx::query_scalar::<_, String>("SELECT password FROM kader WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(hash)
}
