use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{self, postgres::PgArguments, FromRow};

/// A single bound value. Optional variants bind SQL NULL when empty.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(Option<i32>),
    Float(Option<f64>),
    Text(Option<String>),
    Date(Option<NaiveDate>),
    Timestamp(DateTime<Utc>),
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(Some(v))
    }
}

impl From<Option<i32>> for SqlParam {
    fn from(v: Option<i32>) -> Self {
        SqlParam::Int(v)
    }
}

impl From<Option<f64>> for SqlParam {
    fn from(v: Option<f64>) -> Self {
        SqlParam::Float(v)
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(Some(v))
    }
}

impl From<Option<String>> for SqlParam {
    fn from(v: Option<String>) -> Self {
        SqlParam::Text(v)
    }
}

impl From<NaiveDate> for SqlParam {
    fn from(v: NaiveDate) -> Self {
        SqlParam::Date(Some(v))
    }
}

impl From<DateTime<Utc>> for SqlParam {
    fn from(v: DateTime<Utc>) -> Self {
        SqlParam::Timestamp(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl SqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), params: Vec::new() }
    }

    pub fn bind(mut self, value: impl Into<SqlParam>) -> Self {
        self.params.push(value.into());
        self
    }
}

/// Builds a read query on top of a fixed `SELECT ... FROM ... JOIN ...` prefix.
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    base: String,
    conditions: Vec<String>,
    params: Vec<SqlParam>,
    order_by: Vec<String>,
}

impl SelectBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            conditions: Vec::new(),
            params: Vec::new(),
            order_by: Vec::new(),
        }
    }

    /// Case-insensitive substring match OR-ed across `columns`. Blank terms are ignored.
    pub fn search(mut self, columns: &[&str], term: Option<&str>) -> Self {
        let term = match term.map(str::trim) {
            Some(t) if !t.is_empty() && !columns.is_empty() => t,
            _ => return self,
        };
        let placeholder = self.push_param(SqlParam::Text(Some(format!("%{}%", escape_like(term)))));
        let clauses: Vec<String> = columns
            .iter()
            .map(|c| format!("{} ILIKE {}", c, placeholder))
            .collect();
        self.conditions.push(format!("({})", clauses.join(" OR ")));
        self
    }

    pub fn eq(self, column: &str, value: impl Into<SqlParam>) -> Self {
        self.compare(column, "=", value.into())
    }

    pub fn gte(self, column: &str, value: impl Into<SqlParam>) -> Self {
        self.compare(column, ">=", value.into())
    }

    pub fn lt(self, column: &str, value: impl Into<SqlParam>) -> Self {
        self.compare(column, "<", value.into())
    }

    pub fn order_by(mut self, columns: &[&str]) -> Self {
        self.order_by.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn build(self) -> SqlQuery {
        let mut query = self.base;
        if !self.conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.conditions.join(" AND "));
        }
        if !self.order_by.is_empty() {
            query.push_str(" ORDER BY ");
            query.push_str(&self.order_by.join(", "));
        }
        SqlQuery { query, params: self.params }
    }

    fn compare(mut self, column: &str, op: &str, value: SqlParam) -> Self {
        let placeholder = self.push_param(value);
        self.conditions.push(format!("{} {} {}", column, op, placeholder));
        self
    }

    fn push_param(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

/// Escape LIKE wildcards so user input only ever matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Float(f) => q.bind(*f),
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Date(d) => q.bind(*d),
        SqlParam::Timestamp(t) => q.bind(*t),
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Float(f) => q.bind(*f),
        SqlParam::Text(s) => q.bind(s.clone()),
        SqlParam::Date(d) => q.bind(*d),
        SqlParam::Timestamp(t) => q.bind(*t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_select_has_no_where() {
        let sql = SelectBuilder::new("SELECT * FROM ibu").build();
        assert_eq!(sql.query, "SELECT * FROM ibu");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn search_shares_one_placeholder_across_columns() {
        let sql = SelectBuilder::new("SELECT * FROM ibu i")
            .search(&["i.nama_lengkap", "i.nik"], Some("  siti "))
            .order_by(&["i.nama_lengkap ASC", "i.id ASC"])
            .build();
        assert_eq!(
            sql.query,
            "SELECT * FROM ibu i WHERE (i.nama_lengkap ILIKE $1 OR i.nik ILIKE $1) ORDER BY i.nama_lengkap ASC, i.id ASC"
        );
        assert_eq!(sql.params, vec![SqlParam::Text(Some("%siti%".into()))]);
    }

    #[test]
    fn blank_search_is_ignored() {
        let sql = SelectBuilder::new("SELECT * FROM ibu i")
            .search(&["i.nama_lengkap"], Some("   "))
            .search(&["i.nama_lengkap"], None)
            .build();
        assert_eq!(sql.query, "SELECT * FROM ibu i");
    }

    #[test]
    fn conditions_number_placeholders_in_order() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let sql = SelectBuilder::new("SELECT * FROM perkembangan p")
            .search(&["p.saran"], Some("gizi"))
            .eq("p.id_anak", 3)
            .gte("p.tanggal_pemeriksaan", start)
            .build();
        assert_eq!(
            sql.query,
            "SELECT * FROM perkembangan p WHERE (p.saran ILIKE $1) AND p.id_anak = $2 AND p.tanggal_pemeriksaan >= $3"
        );
        assert_eq!(sql.params.len(), 3);
        assert_eq!(sql.params[1], SqlParam::Int(Some(3)));
        assert_eq!(sql.params[2], SqlParam::Date(Some(start)));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
        let sql = SelectBuilder::new("SELECT * FROM kader k")
            .search(&["k.username"], Some("a_b"))
            .build();
        assert_eq!(sql.params, vec![SqlParam::Text(Some("%a\\_b%".into()))]);
    }

    #[test]
    fn sql_query_bind_appends_params() {
        let q = SqlQuery::new("UPDATE ibu SET nama_lengkap = $1 WHERE id = $2")
            .bind("Siti".to_string())
            .bind(4);
        assert_eq!(q.params, vec![SqlParam::Text(Some("Siti".into())), SqlParam::Int(Some(4))]);
    }
}
