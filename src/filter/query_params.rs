use serde_json::{Map, Value};

use super::error::FilterError;
use super::types::FilterOp;

/// Control keys that never become filter conditions
pub const RESERVED_KEYS: [&str; 4] = ["select", "sort", "page", "limit"];

/// A request's query string split into the filter object and control values
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub filter: Map<String, Value>,
    pub select: Option<Vec<String>>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl QueryParams {
    /// Parse a raw query string with bracket syntax (`price[gte]=100`,
    /// `careers[in]=A&careers[in]=B`). Operator keywords are rewritten to
    /// their `$`-prefixed form.
    pub fn parse(raw: Option<&str>) -> Result<Self, FilterError> {
        let mut params = QueryParams::default();
        let mut filter = Map::new();

        for (key, value) in url::form_urlencoded::parse(raw.unwrap_or("").as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "select" => {
                    params.select = Some(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect(),
                    )
                }
                "sort" => params.sort = Some(value),
                "page" => params.page = Some(value),
                "limit" => params.limit = Some(value),
                _ => insert_filter_entry(&mut filter, &key, value)?,
            }
        }

        params.filter = match rewrite_operators(Value::Object(filter)) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Ok(params)
    }

    /// Force a condition regardless of what the client sent (nested routes)
    pub fn with_condition(mut self, field: &str, value: Value) -> Self {
        self.filter.insert(field.to_string(), value);
        self
    }

    pub fn where_clause(&self) -> Value {
        Value::Object(self.filter.clone())
    }
}

fn insert_filter_entry(filter: &mut Map<String, Value>, key: &str, value: String) -> Result<(), FilterError> {
    let (field, op) = split_bracket_key(key)?;

    match op {
        None => push_value(filter, field, value),
        Some(op) => {
            let slot = filter
                .entry(field.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match slot {
                Value::Object(ops) => push_value(ops, op, value),
                _ => return Err(FilterError::MalformedQuery(key.to_string())),
            }
        }
    }
    Ok(())
}

/// `name` -> (name, None); `name[op]` -> (name, Some(op)); `name[]` -> (name, None)
fn split_bracket_key(key: &str) -> Result<(&str, Option<&str>), FilterError> {
    let malformed = || FilterError::MalformedQuery(key.to_string());

    match key.find('[') {
        None => {
            if key.is_empty() || key.contains(']') {
                return Err(malformed());
            }
            Ok((key, None))
        }
        Some(open) => {
            let field = &key[..open];
            let inner = key[open + 1..].strip_suffix(']').ok_or_else(malformed)?;
            if field.is_empty() || inner.contains('[') || inner.contains(']') {
                return Err(malformed());
            }
            Ok((field, Some(inner).filter(|op| !op.is_empty())))
        }
    }
}

/// Repeated keys accumulate into an array
fn push_value(map: &mut Map<String, Value>, key: &str, value: String) {
    match map.get_mut(key) {
        None => {
            map.insert(key.to_string(), Value::String(value));
        }
        Some(Value::Array(values)) => values.push(Value::String(value)),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, Value::String(value)]);
        }
    }
}

/// Prefix comparison keywords appearing as object keys with the `$` operator
/// marker, at any depth.
pub fn rewrite_operators(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let key = if FilterOp::KEYWORDS.contains(&key.as_str()) {
                        format!("${}", key)
                    } else {
                        key
                    };
                    (key, rewrite_operators(value))
                })
                .collect(),
        ),
        Value::Array(values) => Value::Array(values.into_iter().map(rewrite_operators).collect()),
        other => other,
    }
}
