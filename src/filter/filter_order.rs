use super::collection::Collection;
use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse `name,-created_at`: comma-separated fields, `-` prefix for descending
    pub fn parse(collection: &'static Collection, sort: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in sort.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (name, sort) = match trimmed.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (trimmed.trim_start_matches('+'), SortDirection::Asc),
            };
            out.push(FilterOrderInfo { column: collection.sortable(name)?, sort });
        }
        Ok(out)
    }

    /// Newest first
    pub fn default_order(collection: &'static Collection) -> Vec<FilterOrderInfo> {
        collection
            .column("created_at")
            .map(|column| vec![FilterOrderInfo { column, sort: SortDirection::Desc }])
            .unwrap_or_default()
    }

    /// ORDER BY clause; a trailing `id` keeps pages stable across equal sort keys
    pub fn generate(collection: &'static Collection, infos: &[FilterOrderInfo]) -> String {
        let mut parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {}", i.column.expr(collection.table), i.sort.to_sql()))
            .collect();

        if let Some(id) = collection.id_column() {
            if !infos.iter().any(|i| i.column.name == id.name) {
                parts.push(format!("{} ASC", id.expr(collection.table)));
            }
        }

        if parts.is_empty() {
            return String::new();
        }
        format!("ORDER BY {}", parts.join(", "))
    }
}
