use sqlx::{self, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{bind_param_query, bind_param_query_as, SelectBuilder, SqlQuery};
use crate::database::resource::Resource;

/// Uniform data access for any [`Resource`]. Every write is a single statement.
pub struct Repository<R> {
    pool: PgPool,
    _phantom: std::marker::PhantomData<R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// List rows, optionally narrowed by a search term and the resource's parent filter.
    pub async fn select_any(
        &self,
        search: Option<&str>,
        parent_id: Option<i32>,
    ) -> Result<Vec<R::Record>, DatabaseError> {
        let mut builder = SelectBuilder::new(R::SELECT).search(R::SEARCH_COLUMNS, search);
        if let (Some(parent), Some(id)) = (R::PARENT_FILTER, parent_id) {
            builder = builder.eq(parent.column, id);
        }
        let sql = builder.order_by(R::ORDER_BY).build();
        fetch_all::<R::Record>(&self.pool, &sql).await
    }

    pub async fn select_one(&self, id: i32) -> Result<Option<R::Record>, DatabaseError> {
        let sql = SelectBuilder::new(R::SELECT).eq(R::ID_COLUMN, id).build();
        let mut q = sqlx::query_as::<_, R::Record>(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(&self.pool).await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i32) -> Result<R::Record, DatabaseError> {
        self.select_one(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(R::NOT_FOUND.to_string()))
    }

    /// Run an `INSERT ... RETURNING id` and hand back the new key.
    pub async fn insert(&self, sql: SqlQuery) -> Result<i32, DatabaseError> {
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let id: i32 = row.try_get("id")?;
        Ok(id)
    }

    /// Run a single-row `UPDATE`; zero affected rows means the id does not exist.
    pub async fn update(&self, sql: SqlQuery) -> Result<(), DatabaseError> {
        self.execute_one(sql).await
    }

    pub async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        let sql = SqlQuery::new(format!("DELETE FROM {} WHERE id = $1", R::TABLE)).bind(id);
        self.execute_one(sql).await
    }

    async fn execute_one(&self, sql: SqlQuery) -> Result<(), DatabaseError> {
        let mut q = sqlx::query(&sql.query);
        for p in sql.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(R::NOT_FOUND.to_string()));
        }
        Ok(())
    }
}

/// Run a prepared read and map every row onto `T`.
pub async fn fetch_all<T>(pool: &PgPool, sql: &SqlQuery) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    tracing::debug!("{} ({} params)", sql.query, sql.params.len());
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    let rows = q.fetch_all(pool).await?;
    Ok(rows)
}
