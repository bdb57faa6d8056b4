use serde_json::Value;

use super::collection::{Collection, ColumnDef, Expansion};
use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::pagination::PageRequest;
use super::query_params::QueryParams;
use super::types::{FilterOrderInfo, SqlResult};
use crate::config::FilterConfig;

/// Query over one collection. Each result row is a single JSON object built
/// in SQL (`json_build_object(...) AS row`).
pub struct Filter {
    collection: &'static Collection,
    select_columns: Vec<&'static ColumnDef>,
    where_data: Option<Value>,
    order_data: Vec<FilterOrderInfo>,
    expansions: Vec<&'static Expansion>,
    page: Option<PageRequest>,
}

impl Filter {
    pub fn new(collection: &'static Collection) -> Self {
        Self {
            collection,
            select_columns: vec![],
            where_data: None,
            order_data: FilterOrder::default_order(collection),
            expansions: vec![],
            page: None,
        }
    }

    /// Apply everything a list request carries: filter, projection, sort and page
    pub fn assign(&mut self, params: &QueryParams, config: &FilterConfig) -> Result<&mut Self, FilterError> {
        self.where_clause(params.where_clause())?;
        if let Some(select) = &params.select {
            self.select(select)?;
        }
        if let Some(sort) = &params.sort {
            self.order(sort)?;
        }
        self.paginate(PageRequest::from_params(
            params.page.as_deref(),
            params.limit.as_deref(),
            config,
        ));
        Ok(self)
    }

    pub fn select(&mut self, columns: &[String]) -> Result<&mut Self, FilterError> {
        let mut selected: Vec<&'static ColumnDef> = self.collection.id_column().into_iter().collect();
        for name in columns {
            let column = self.collection.selectable(name)?;
            if !selected.iter().any(|c| c.name == column.name) {
                selected.push(column);
            }
        }
        self.select_columns = selected;
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn order(&mut self, sort: &str) -> Result<&mut Self, FilterError> {
        let order = FilterOrder::parse(self.collection, sort)?;
        if !order.is_empty() {
            self.order_data = order;
        }
        Ok(self)
    }

    pub fn expand(&mut self, expansion: &'static Expansion) -> &mut Self {
        self.expansions.push(expansion);
        self
    }

    pub fn paginate(&mut self, page: PageRequest) -> &mut Self {
        self.page = Some(page);
        self
    }

    pub fn page_request(&self) -> Option<PageRequest> {
        self.page
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let select_clause = self.build_select_clause()?;
        let where_result = self.to_where_sql()?;
        let order_clause = FilterOrder::generate(self.collection, &self.order_data);
        let limit_clause = self.build_limit_clause();

        let query = [
            format!("SELECT {} AS row", select_clause),
            format!("FROM \"{}\"", self.collection.table),
            if where_result.query.is_empty() { String::new() } else { format!("WHERE {}", where_result.query) },
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = match &self.where_data {
            Some(where_data) => FilterWhere::generate(self.collection, where_data, 0)?,
            None => (String::new(), vec![]),
        };
        Ok(SqlResult { query, params })
    }

    /// Count of everything the filter matches, ignoring pagination
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let query = if where_result.query.is_empty() {
            format!("SELECT COUNT(*) AS count FROM \"{}\"", self.collection.table)
        } else {
            format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                self.collection.table, where_result.query
            )
        };
        Ok(SqlResult { query, params: where_result.params })
    }

    fn build_select_clause(&self) -> Result<String, FilterError> {
        let columns = if self.select_columns.is_empty() {
            self.collection.default_projection()
        } else {
            self.select_columns.clone()
        };

        let mut pairs: Vec<String> = columns
            .iter()
            .map(|c| format!("'{}', {}", c.name, c.expr(self.collection.table)))
            .collect();
        for expansion in &self.expansions {
            pairs.push(format!("'{}', {}", expansion.field(), expansion.to_sql(self.collection)?));
        }

        Ok(format!("json_build_object({})", pairs.join(", ")))
    }

    fn build_limit_clause(&self) -> String {
        match self.page {
            Some(page) => format!("LIMIT {} OFFSET {}", page.limit, page.offset()),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::collection::{ACCOUNTS, COURSES, LISTINGS, PARENT_LISTING};

    fn config() -> FilterConfig {
        FilterConfig { default_limit: 25, max_limit: Some(100), debug_logging: false }
    }

    #[test]
    fn projection_sort_and_page_from_query_string() {
        let params = QueryParams::parse(Some("select=name,description&sort=-name&page=2&limit=5")).unwrap();
        let mut filter = Filter::new(&LISTINGS);
        filter.assign(&params, &config()).unwrap();

        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT json_build_object('id', \"listings\".\"id\", 'name', \"listings\".\"name\", \
'description', \"listings\".\"description\") AS row FROM \"listings\" \
ORDER BY \"listings\".\"name\" DESC, \"listings\".\"id\" ASC LIMIT 5 OFFSET 5"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn count_ignores_pagination_but_keeps_filter() {
        let params = QueryParams::parse(Some("housing=true&page=3&limit=2")).unwrap();
        let mut filter = Filter::new(&LISTINGS);
        filter.assign(&params, &config()).unwrap();

        let count = filter.to_count_sql().unwrap();
        assert_eq!(
            count.query,
            "SELECT COUNT(*) AS count FROM \"listings\" WHERE \"listings\".\"housing\" = $1"
        );
        assert_eq!(count.params, vec![Value::Bool(true)]);
    }

    #[test]
    fn default_projection_hides_secrets() {
        let filter = Filter::new(&ACCOUNTS);
        let sql = filter.to_sql().unwrap().query;
        assert!(sql.contains("'email'"));
        assert!(!sql.contains("password"));
        assert!(!sql.contains("reset_password"));
    }

    #[test]
    fn selecting_hidden_field_fails() {
        let mut filter = Filter::new(&ACCOUNTS);
        assert!(matches!(
            filter.select(&["password".to_string()]),
            Err(FilterError::InvalidColumn(_))
        ));
    }

    #[test]
    fn expansion_is_added_to_projection() {
        let mut filter = Filter::new(&COURSES);
        filter.expand(&PARENT_LISTING);
        let sql = filter.to_sql().unwrap().query;
        assert!(sql.contains("'listing', (SELECT json_build_object('id', \"rel\".\"id\""));
    }
}
