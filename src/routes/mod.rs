//! Router builders.

mod admin;
mod common;

pub use admin::{admin_app, admin_routes, BODY_LIMIT_BYTES};
pub use common::common_routes;
