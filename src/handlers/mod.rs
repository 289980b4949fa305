//! HTTP handlers for schema introspection and generic record CRUD.

pub mod model;
pub mod schema;
pub use model::*;
pub use schema::*;
