use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid field name: {0}")]
    InvalidColumn(String),

    #[error("Invalid filter on {0}")]
    InvalidWhereClause(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid value for {column}: {value}")]
    InvalidValue { column: String, value: String },

    #[error("Invalid sort field: {0}")]
    InvalidSort(String),

    #[error("Malformed query parameter: {0}")]
    MalformedQuery(String),
}
