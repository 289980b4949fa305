//! Admin routes: schema introspection plus generic CRUD over every registered model.
//! Handlers resolve the provider from the `:model` path segment.

use crate::error::ConfigError;
use crate::handlers::{create, delete, get_schema, list, list_schemas, read, update};
use crate::routes::common_routes;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request bodies above this size are rejected with 413.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/schemas", get(list_schemas))
        .route("/schemas/:model", get(get_schema))
        .route("/models/:model", get(list).post(create))
        .route(
            "/models/:model/:id",
            get(read).put(update).patch(update).delete(delete),
        )
        .with_state(state)
}

/// Full application: common routes at the root, admin routes under `prefix` (e.g. `/api/admin`),
/// wrapped in tracing, body-limit and the configured CORS policy.
pub fn admin_app(state: AppState, prefix: &str) -> Result<Router, ConfigError> {
    let cors = state.config.cors.layer()?;
    let app = Router::new()
        .merge(common_routes(state.clone()))
        .nest(prefix, admin_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Cors needs a `Default` inner body, so it sits inside the limit.
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
                .layer(cors),
        );
    Ok(app)
}
