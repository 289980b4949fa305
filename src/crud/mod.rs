//! CRUD contract: schema format, provider trait, pagination and filters.

mod filter;
mod pagination;
mod provider;
mod schema;

pub use filter::{Condition, ListFilters, SEARCH_KEY};
pub use pagination::{ListResponse, Pagination, DEFAULT_LIMIT, MAX_LIMIT};
pub use provider::{from_data, to_record, CrudProvider, Data, Filters, Record};
pub use schema::{Field, FieldType, Schema};
