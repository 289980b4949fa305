//! Admin SDK: schema-driven CRUD contract, error taxonomy and a generic admin HTTP surface.

pub mod config;
pub mod crud;
pub mod error;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod service;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use crud::{CrudProvider, Data, Field, FieldType, Filters, ListResponse, Pagination, Record, Schema};
pub use error::{AppError, AppResult, ConfigError, ErrorKind, SchemaError};
pub use registry::Registry;
pub use routes::{admin_app, admin_routes, common_routes};
pub use service::{MemoryProvider, RequestValidator};
pub use state::AppState;
pub use telemetry::init_tracing;
