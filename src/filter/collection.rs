use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Number, Value};
use uuid::Uuid;

use super::error::FilterError;

/// Storage type of a column, used to coerce query-string values before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Float,
    Bool,
    Uuid,
    Timestamp,
    TextArray,
    /// Computed from other columns; selectable only
    Derived(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Usable in filters and sorting but never returned directly
    FilterOnly,
    /// Never selectable, filterable or sortable
    Hidden,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub access: Access,
}

impl ColumnDef {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind, access: Access::Public }
    }

    pub const fn filter_only(self) -> Self {
        Self { access: Access::FilterOnly, ..self }
    }

    pub const fn hidden(self) -> Self {
        Self { access: Access::Hidden, ..self }
    }

    pub fn is_selectable(&self) -> bool {
        self.access == Access::Public
    }

    pub fn is_filterable(&self) -> bool {
        self.access != Access::Hidden && !matches!(self.kind, ColumnKind::Derived(_))
    }

    /// SQL expression producing this column's value
    pub fn expr(&self, table: &str) -> String {
        match self.kind {
            ColumnKind::Derived(expr) => expr.to_string(),
            _ => format!("\"{}\".\"{}\"", table, self.name),
        }
    }

    /// Bind placeholder with the cast Postgres needs for text-encoded params
    pub fn placeholder(&self, index: usize) -> String {
        match self.kind {
            ColumnKind::Uuid => format!("${}::uuid", index),
            ColumnKind::Timestamp => format!("${}::timestamptz", index),
            _ => format!("${}", index),
        }
    }

    /// Convert a raw (usually string) filter value into the JSON type that
    /// binds correctly for this column.
    pub fn coerce(&self, raw: &Value) -> Result<Value, FilterError> {
        let invalid = || FilterError::InvalidValue {
            column: self.name.to_string(),
            value: match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
        };

        match (self.kind, raw) {
            (_, Value::Null) => Ok(Value::Null),
            (ColumnKind::Text | ColumnKind::TextArray, Value::String(s)) => Ok(Value::String(s.clone())),
            (ColumnKind::Text | ColumnKind::TextArray, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (ColumnKind::Integer, Value::Number(n)) => n.as_i64().map(Value::from).ok_or_else(invalid),
            (ColumnKind::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().map(Value::from).map_err(|_| invalid())
            }
            (ColumnKind::Float, Value::Number(n)) => n
                .as_f64()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            (ColumnKind::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid),
            (ColumnKind::Bool, Value::Bool(b)) => Ok(Value::Bool(*b)),
            (ColumnKind::Bool, Value::String(s)) => match s.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid()),
            },
            (ColumnKind::Uuid, Value::String(s)) => Uuid::parse_str(s.trim())
                .map(|id| Value::String(id.to_string()))
                .map_err(|_| invalid()),
            (ColumnKind::Timestamp, Value::String(s)) => parse_timestamp(s.trim())
                .map(|ts| Value::String(ts.to_rfc3339()))
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A queryable entity collection: its table and typed column table
#[derive(Debug)]
pub struct Collection {
    pub table: &'static str,
    pub columns: &'static [ColumnDef],
    /// Dotted client-facing names that map onto flat columns (`location.city`)
    pub aliases: &'static [(&'static str, &'static str)],
}

impl Collection {
    pub fn column(&'static self, name: &str) -> Option<&'static ColumnDef> {
        let name = self
            .aliases
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, target)| *target)
            .unwrap_or(name);
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn selectable(&'static self, name: &str) -> Result<&'static ColumnDef, FilterError> {
        self.column(name)
            .filter(|c| c.is_selectable())
            .ok_or_else(|| FilterError::InvalidColumn(name.to_string()))
    }

    pub fn filterable(&'static self, name: &str) -> Result<&'static ColumnDef, FilterError> {
        self.column(name)
            .filter(|c| c.is_filterable())
            .ok_or_else(|| FilterError::InvalidColumn(name.to_string()))
    }

    pub fn sortable(&'static self, name: &str) -> Result<&'static ColumnDef, FilterError> {
        self.column(name)
            .filter(|c| c.is_filterable())
            .ok_or_else(|| FilterError::InvalidSort(name.to_string()))
    }

    pub fn default_projection(&'static self) -> Vec<&'static ColumnDef> {
        self.columns.iter().filter(|c| c.is_selectable()).collect()
    }

    pub fn id_column(&'static self) -> Option<&'static ColumnDef> {
        self.column("id")
    }
}

/// Relation expansion: inline fields of related rows into each result
#[derive(Debug)]
pub enum Expansion {
    /// Single referenced parent, via `foreign_key` on the source row
    BelongsTo {
        field: &'static str,
        foreign_key: &'static str,
        target: &'static Collection,
        columns: &'static [&'static str],
    },
    /// All rows of `target` whose `foreign_key` points at the source row
    HasMany {
        field: &'static str,
        foreign_key: &'static str,
        target: &'static Collection,
        columns: &'static [&'static str],
    },
}

impl Expansion {
    pub fn field(&self) -> &'static str {
        match self {
            Expansion::BelongsTo { field, .. } | Expansion::HasMany { field, .. } => field,
        }
    }

    /// Correlated subquery producing the expanded JSON for one source row
    pub fn to_sql(&self, source: &Collection) -> Result<String, FilterError> {
        match self {
            Expansion::BelongsTo { foreign_key, target, columns, .. } => Ok(format!(
                "(SELECT {} FROM \"{}\" AS \"rel\" WHERE \"rel\".\"id\" = \"{}\".\"{}\")",
                Self::json_object(target, columns)?,
                target.table,
                source.table,
                foreign_key
            )),
            Expansion::HasMany { foreign_key, target, columns, .. } => {
                let order = match target.column("created_at") {
                    Some(_) => " ORDER BY \"rel\".\"created_at\"",
                    None => "",
                };
                Ok(format!(
                    "(SELECT COALESCE(json_agg({}{}), '[]'::json) FROM \"{}\" AS \"rel\" WHERE \"rel\".\"{}\" = \"{}\".\"id\")",
                    Self::json_object(target, columns)?,
                    order,
                    target.table,
                    foreign_key,
                    source.table
                ))
            }
        }
    }

    fn json_object(target: &'static Collection, columns: &[&str]) -> Result<String, FilterError> {
        let mut pairs = Vec::with_capacity(columns.len());
        for name in columns {
            let column = target.selectable(name)?;
            if matches!(column.kind, ColumnKind::Derived(_)) {
                return Err(FilterError::InvalidColumn(name.to_string()));
            }
            pairs.push(format!("'{}', \"rel\".\"{}\"", column.name, column.name));
        }
        Ok(format!("json_build_object({})", pairs.join(", ")))
    }
}

pub static ACCOUNTS: Collection = Collection {
    table: "accounts",
    columns: &[
        ColumnDef::new("id", ColumnKind::Uuid),
        ColumnDef::new("name", ColumnKind::Text),
        ColumnDef::new("email", ColumnKind::Text),
        ColumnDef::new("role", ColumnKind::Text),
        ColumnDef::new("password", ColumnKind::Text).hidden(),
        ColumnDef::new("reset_password_token", ColumnKind::Text).hidden(),
        ColumnDef::new("reset_password_expire", ColumnKind::Timestamp).hidden(),
        ColumnDef::new("created_at", ColumnKind::Timestamp),
    ],
    aliases: &[],
};

const LISTING_LOCATION: &str = "CASE WHEN \"listings\".\"longitude\" IS NULL THEN NULL ELSE json_build_object(\
'type', 'Point', \
'coordinates', json_build_array(\"listings\".\"longitude\", \"listings\".\"latitude\"), \
'formatted_address', \"listings\".\"formatted_address\", \
'street', \"listings\".\"street\", \
'city', \"listings\".\"city\", \
'state', \"listings\".\"state\", \
'zipcode', \"listings\".\"zipcode\", \
'country', \"listings\".\"country\") END";

pub static LISTINGS: Collection = Collection {
    table: "listings",
    columns: &[
        ColumnDef::new("id", ColumnKind::Uuid),
        ColumnDef::new("name", ColumnKind::Text),
        ColumnDef::new("slug", ColumnKind::Text),
        ColumnDef::new("description", ColumnKind::Text),
        ColumnDef::new("website", ColumnKind::Text),
        ColumnDef::new("phone", ColumnKind::Text),
        ColumnDef::new("email", ColumnKind::Text),
        ColumnDef::new("location", ColumnKind::Derived(LISTING_LOCATION)),
        ColumnDef::new("careers", ColumnKind::TextArray),
        ColumnDef::new("average_rating", ColumnKind::Float),
        ColumnDef::new("average_cost", ColumnKind::Integer),
        ColumnDef::new("photo", ColumnKind::Text),
        ColumnDef::new("housing", ColumnKind::Bool),
        ColumnDef::new("job_assistance", ColumnKind::Bool),
        ColumnDef::new("job_guarantee", ColumnKind::Bool),
        ColumnDef::new("accept_gi", ColumnKind::Bool),
        ColumnDef::new("account_id", ColumnKind::Uuid),
        ColumnDef::new("created_at", ColumnKind::Timestamp),
        ColumnDef::new("longitude", ColumnKind::Float).filter_only(),
        ColumnDef::new("latitude", ColumnKind::Float).filter_only(),
        ColumnDef::new("formatted_address", ColumnKind::Text).filter_only(),
        ColumnDef::new("street", ColumnKind::Text).filter_only(),
        ColumnDef::new("city", ColumnKind::Text).filter_only(),
        ColumnDef::new("state", ColumnKind::Text).filter_only(),
        ColumnDef::new("zipcode", ColumnKind::Text).filter_only(),
        ColumnDef::new("country", ColumnKind::Text).filter_only(),
    ],
    aliases: &[
        ("location.formatted_address", "formatted_address"),
        ("location.street", "street"),
        ("location.city", "city"),
        ("location.state", "state"),
        ("location.zipcode", "zipcode"),
        ("location.country", "country"),
    ],
};

pub static COURSES: Collection = Collection {
    table: "courses",
    columns: &[
        ColumnDef::new("id", ColumnKind::Uuid),
        ColumnDef::new("title", ColumnKind::Text),
        ColumnDef::new("description", ColumnKind::Text),
        ColumnDef::new("weeks", ColumnKind::Text),
        ColumnDef::new("tuition", ColumnKind::Integer),
        ColumnDef::new("minimum_skill", ColumnKind::Text),
        ColumnDef::new("scholarship_available", ColumnKind::Bool),
        ColumnDef::new("listing_id", ColumnKind::Uuid),
        ColumnDef::new("account_id", ColumnKind::Uuid),
        ColumnDef::new("created_at", ColumnKind::Timestamp),
    ],
    aliases: &[],
};

pub static REVIEWS: Collection = Collection {
    table: "reviews",
    columns: &[
        ColumnDef::new("id", ColumnKind::Uuid),
        ColumnDef::new("title", ColumnKind::Text),
        ColumnDef::new("text", ColumnKind::Text),
        ColumnDef::new("rating", ColumnKind::Integer),
        ColumnDef::new("listing_id", ColumnKind::Uuid),
        ColumnDef::new("account_id", ColumnKind::Uuid),
        ColumnDef::new("created_at", ColumnKind::Timestamp),
    ],
    aliases: &[],
};

/// `listing: {id, name, description}` on courses and reviews
pub static PARENT_LISTING: Expansion = Expansion::BelongsTo {
    field: "listing",
    foreign_key: "listing_id",
    target: &LISTINGS,
    columns: &["id", "name", "description"],
};

/// `courses: [...]` on listings
pub static LISTING_COURSES: Expansion = Expansion::HasMany {
    field: "courses",
    foreign_key: "listing_id",
    target: &COURSES,
    columns: &[
        "id",
        "title",
        "description",
        "weeks",
        "tuition",
        "minimum_skill",
        "scholarship_available",
        "listing_id",
        "account_id",
        "created_at",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hidden_columns_are_not_selectable_or_filterable() {
        assert!(ACCOUNTS.selectable("password").is_err());
        assert!(ACCOUNTS.filterable("password").is_err());
        assert!(ACCOUNTS.filterable("reset_password_token").is_err());
        assert!(ACCOUNTS.selectable("email").is_ok());
    }

    #[test]
    fn derived_location_is_select_only() {
        assert!(LISTINGS.selectable("location").is_ok());
        assert!(LISTINGS.filterable("location").is_err());
        assert!(LISTINGS.selectable("city").is_err());
        assert_eq!(LISTINGS.filterable("location.city").unwrap().name, "city");
    }

    #[test]
    fn coerces_by_column_kind() {
        let cost = LISTINGS.filterable("average_cost").unwrap();
        assert_eq!(cost.coerce(&json!("10000")).unwrap(), json!(10000));
        assert!(cost.coerce(&json!("cheap")).is_err());

        let housing = LISTINGS.filterable("housing").unwrap();
        assert_eq!(housing.coerce(&json!("true")).unwrap(), json!(true));
        assert!(housing.coerce(&json!("yes")).is_err());

        let rating = LISTINGS.filterable("average_rating").unwrap();
        assert_eq!(rating.coerce(&json!("7.5")).unwrap(), json!(7.5));

        let owner = LISTINGS.filterable("account_id").unwrap();
        assert!(owner.coerce(&json!("not-a-uuid")).is_err());
        assert_eq!(owner.placeholder(3), "$3::uuid");

        let created = LISTINGS.filterable("created_at").unwrap();
        assert_eq!(
            created.coerce(&json!("2024-01-15")).unwrap(),
            json!("2024-01-15T00:00:00+00:00")
        );
    }

    #[test]
    fn belongs_to_expansion_is_correlated() {
        let sql = PARENT_LISTING.to_sql(&COURSES).unwrap();
        assert!(sql.contains("FROM \"listings\" AS \"rel\""));
        assert!(sql.contains("\"rel\".\"id\" = \"courses\".\"listing_id\""));
        assert!(sql.contains("'description', \"rel\".\"description\""));
    }

    #[test]
    fn has_many_expansion_defaults_to_empty_array() {
        let sql = LISTING_COURSES.to_sql(&LISTINGS).unwrap();
        assert!(sql.starts_with("(SELECT COALESCE(json_agg("));
        assert!(sql.contains("'[]'::json"));
        assert!(sql.contains("\"rel\".\"listing_id\" = \"listings\".\"id\""));
    }
}
