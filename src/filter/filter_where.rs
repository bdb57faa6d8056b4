use serde_json::Value;

use super::collection::{Collection, ColumnDef, ColumnKind};
use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo};

/// Builds a parameterized WHERE clause from a `{field: value | {$op: value}}` object
pub struct FilterWhere {
    collection: &'static Collection,
    param_values: Vec<Value>,
    param_index: usize,
    conditions: Vec<FilterWhereInfo>,
}

impl FilterWhere {
    pub fn new(collection: &'static Collection, starting_param_index: usize) -> Self {
        Self {
            collection,
            param_values: vec![],
            param_index: starting_param_index,
            conditions: vec![],
        }
    }

    /// Returns the clause (empty when there are no conditions) and its params
    pub fn generate(
        collection: &'static Collection,
        where_data: &Value,
        starting_param_index: usize,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(collection, starting_param_index);
        filter_where.build(where_data)
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("query".to_string())),
        }
    }

    fn build(&mut self, where_data: &Value) -> Result<(String, Vec<Value>), FilterError> {
        self.parse_where_data(where_data)?;

        let conditions = std::mem::take(&mut self.conditions);
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in &conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }

        Ok((sql_conditions.join(" AND "), std::mem::take(&mut self.param_values)))
    }

    fn parse_where_data(&mut self, where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null => Ok(()),
            Value::Object(obj) => {
                for (key, value) in obj {
                    self.parse_field_condition(key, value)?;
                }
                Ok(())
            }
            _ => Err(FilterError::InvalidWhereClause("query".to_string())),
        }
    }

    fn parse_field_condition(&mut self, field: &str, value: &Value) -> Result<(), FilterError> {
        let column = self.collection.filterable(field)?;

        match value {
            Value::Object(obj) => {
                if obj.is_empty() {
                    return Err(FilterError::InvalidWhereClause(field.to_string()));
                }
                for (op_key, op_val) in obj {
                    let operator = FilterOp::from_key(op_key)
                        .ok_or_else(|| FilterError::UnsupportedOperator(op_key.trim_start_matches('$').to_string()))?;
                    self.conditions.push(FilterWhereInfo { column, operator, data: op_val.clone() });
                }
            }
            // Repeated plain keys (`?careers=A&careers=B`) match any of the values
            Value::Array(_) => {
                self.conditions.push(FilterWhereInfo { column, operator: FilterOp::In, data: value.clone() });
            }
            _ => {
                self.conditions.push(FilterWhereInfo { column, operator: FilterOp::Eq, data: value.clone() });
            }
        }
        Ok(())
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let column = condition.column;
        let expr = column.expr(self.collection.table);
        let is_array = column.kind == ColumnKind::TextArray;

        match condition.operator {
            FilterOp::Eq => {
                let value = column.coerce(&condition.data)?;
                if value.is_null() {
                    return Ok(format!("{} IS NULL", expr));
                }
                let placeholder = self.param(column, value);
                if is_array {
                    Ok(format!("{} = ANY({})", placeholder, expr))
                } else {
                    Ok(format!("{} = {}", expr, placeholder))
                }
            }
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte => {
                if is_array || column.kind == ColumnKind::Bool {
                    return Err(FilterError::UnsupportedOperator(format!(
                        "{} on {}",
                        condition.operator.sql_comparator(),
                        column.name
                    )));
                }
                let value = column.coerce(&condition.data)?;
                if value.is_null() {
                    return Err(FilterError::InvalidValue {
                        column: column.name.to_string(),
                        value: "null".to_string(),
                    });
                }
                let placeholder = self.param(column, value);
                Ok(format!("{} {} {}", expr, condition.operator.sql_comparator(), placeholder))
            }
            FilterOp::In => {
                let values = match &condition.data {
                    Value::Array(values) => values.clone(),
                    // A single `in` value may carry a comma-separated list
                    Value::String(s) => s.split(',').map(|v| Value::String(v.trim().to_string())).collect(),
                    other => vec![other.clone()],
                };
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }

                let mut placeholders = Vec::with_capacity(values.len());
                for raw in &values {
                    let value = column.coerce(raw)?;
                    placeholders.push(self.param(column, value));
                }

                if is_array {
                    Ok(format!("{} && ARRAY[{}]::text[]", expr, placeholders.join(", ")))
                } else {
                    Ok(format!("{} IN ({})", expr, placeholders.join(", ")))
                }
            }
        }
    }

    fn param(&mut self, column: &ColumnDef, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        column.placeholder(self.param_index)
    }
}
