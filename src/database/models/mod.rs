pub mod anak;
pub mod ibu;
pub mod imunisasi;
pub mod kader;
pub mod perkembangan;

use chrono::NaiveDate;
use thiserror::Error;

pub const NIK_MAX_LEN: usize = 16;

/// Payload problems caught before anything reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Data tidak lengkap atau format salah.")]
    Incomplete,

    #[error("NIK tidak boleh lebih dari 16 karakter.")]
    NikTooLong,

    #[error("{0}")]
    Invalid(&'static str),
}

/// Trimmed required text; blank counts as missing.
pub fn required(value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Incomplete);
    }
    Ok(trimmed.to_string())
}

/// Trimmed optional text; blank is stored as NULL.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn required_id(value: i32) -> Result<i32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::Incomplete);
    }
    Ok(value)
}

pub fn nik(value: String) -> Result<String, ValidationError> {
    let value = required(value)?;
    check_nik_len(&value)?;
    Ok(value)
}

pub fn optional_nik(value: Option<String>) -> Result<Option<String>, ValidationError> {
    let value = optional(value);
    if let Some(v) = &value {
        check_nik_len(v)?;
    }
    Ok(value)
}

fn check_nik_len(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NIK_MAX_LEN {
        return Err(ValidationError::NikTooLong);
    }
    Ok(())
}

/// Calendar date in `YYYY-MM-DD` form.
pub fn date(value: &str, message: &'static str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::Invalid(message))
}

/// Optional physical measurement; must be a finite, non-negative number.
pub fn measurement(value: Option<f64>, message: &'static str) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(ValidationError::Invalid(message)),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nik_of_sixteen_is_accepted_and_seventeen_rejected() {
        assert_eq!(nik("3201010101010001".into()).unwrap(), "3201010101010001");
        assert_eq!(nik("32010101010100011".into()), Err(ValidationError::NikTooLong));
        assert_eq!(
            optional_nik(Some("32010101010100011".into())),
            Err(ValidationError::NikTooLong)
        );
    }

    #[test]
    fn blank_optional_nik_becomes_null() {
        assert_eq!(optional_nik(Some("   ".into())).unwrap(), None);
        assert_eq!(optional_nik(None).unwrap(), None);
    }

    #[test]
    fn blank_required_is_incomplete() {
        assert_eq!(required("  ".into()), Err(ValidationError::Incomplete));
        assert_eq!(required(" Siti ".into()).unwrap(), "Siti");
        assert_eq!(required_id(0), Err(ValidationError::Incomplete));
    }

    #[test]
    fn dates_must_be_calendar_days() {
        let msg = "Format tanggal salah.";
        assert_eq!(
            date("2024-02-29", msg).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(date("2023-02-29", msg), Err(ValidationError::Invalid(msg)));
        assert_eq!(date("29/02/2024", msg), Err(ValidationError::Invalid(msg)));
    }

    #[test]
    fn negative_measurement_is_rejected() {
        let msg = "Format Berat Lahir tidak valid.";
        assert_eq!(measurement(Some(3.2), msg).unwrap(), Some(3.2));
        assert_eq!(measurement(None, msg).unwrap(), None);
        assert_eq!(measurement(Some(-1.0), msg), Err(ValidationError::Invalid(msg)));
        assert_eq!(measurement(Some(f64::NAN), msg), Err(ValidationError::Invalid(msg)));
    }
}
