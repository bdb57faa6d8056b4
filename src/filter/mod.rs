//! Generic query builder: turns untyped query parameters into a filtered,
//! projected, sorted and paginated SQL fetch over a registered collection.

pub mod collection;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod pagination;
pub mod query_params;
pub mod types;

pub use collection::{Collection, ColumnDef, ColumnKind, Expansion};
pub use filter::Filter;
pub use pagination::{PageLink, PageRequest, Pagination};
pub use query_params::QueryParams;
pub use types::*;
