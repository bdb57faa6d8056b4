use serde::Serialize;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row};
use uuid::Uuid;

use crate::config::FilterConfig;
use crate::database::manager::DatabaseError;
use crate::filter::{Collection, Expansion, Filter, PageRequest, Pagination, QueryParams, SqlResult};

/// Result of a list query: the page of items plus neighbouring page links
#[derive(Debug, Clone, Serialize)]
pub struct AdvancedResults {
    pub count: usize,
    pub pagination: Pagination,
    pub data: Vec<Value>,
}

/// Runs the generic query builder against one collection
pub struct QueryBuilder {
    filter: Filter,
}

impl QueryBuilder {
    pub fn new(collection: &'static Collection) -> Self {
        Self { filter: Filter::new(collection) }
    }

    pub fn params(mut self, params: &QueryParams, config: &FilterConfig) -> Result<Self, DatabaseError> {
        self.filter.assign(params, config)?;
        Ok(self)
    }

    pub fn expand(mut self, expansion: Option<&'static Expansion>) -> Self {
        if let Some(expansion) = expansion {
            self.filter.expand(expansion);
        }
        self
    }

    /// Fetch the requested page and the filtered total, then derive pagination
    pub async fn advanced_results(self, pool: &PgPool) -> Result<AdvancedResults, DatabaseError> {
        let sql = self.filter.to_sql()?;
        let count_sql = self.filter.to_count_sql()?;
        let page = self
            .filter
            .page_request()
            .unwrap_or(PageRequest { page: 1, limit: i64::MAX });

        tracing::debug!("advanced results: {}", sql.query);

        let data = fetch_rows(pool, &sql).await?;
        let total = fetch_count(pool, &count_sql).await?;

        Ok(AdvancedResults {
            count: data.len(),
            pagination: Pagination::compute(page, total),
            data,
        })
    }

    /// Single row by id, with the same projection and expansion as list queries
    pub async fn find_by_id(mut self, id: Uuid, pool: &PgPool) -> Result<Option<Value>, DatabaseError> {
        self.filter
            .where_clause(serde_json::json!({ "id": id.to_string() }))?;
        let sql = self.filter.to_sql()?;
        Ok(fetch_rows(pool, &sql).await?.into_iter().next())
    }
}

async fn fetch_rows(pool: &PgPool, sql: &SqlResult) -> Result<Vec<Value>, DatabaseError> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param(q, p);
    }
    let rows = q.fetch_all(pool).await?;
    rows.iter()
        .map(|row| row.try_get::<Value, _>("row").map_err(DatabaseError::from))
        .collect()
}

async fn fetch_count(pool: &PgPool, sql: &SqlResult) -> Result<i64, DatabaseError> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param(q, p);
    }
    let row = q.fetch_one(pool).await?;
    Ok(row.try_get("count")?)
}

/// Bind a filter parameter by its JSON type. Values were already coerced to
/// the column type, so strings cover text, uuid and timestamp columns.
fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
