use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::Collection;

/// Typed row access for one collection
pub struct Repository<T> {
    collection: &'static Collection,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(collection: &'static Collection, pool: PgPool) -> Self {
        Self {
            collection,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_optional(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let query = format!("SELECT * FROM \"{}\" WHERE \"id\" = $1", self.collection.table);
        let row = sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Fetch by id or fail with `NotFound(message)`
    pub async fn select_404(&self, id: Uuid, message: impl Into<String>) -> Result<T, DatabaseError> {
        self.select_optional(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(message.into()))
    }

    /// Rows whose `column` holds `value`
    pub async fn count_by(&self, column: &str, value: Uuid) -> Result<i64, DatabaseError> {
        let column = self.collection.filterable(column)?;
        let query = format!(
            "SELECT COUNT(*) FROM \"{}\" WHERE \"{}\" = $1",
            self.collection.table, column.name
        );
        let count: i64 = sqlx::query_scalar(&query)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let query = format!(
            "SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE \"id\" = $1)",
            self.collection.table
        );
        let exists: bool = sqlx::query_scalar(&query)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
