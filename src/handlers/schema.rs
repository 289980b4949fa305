//! Schema introspection handlers used by the frontend to render forms and tables.

use crate::crud::Schema;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};

pub async fn list_schemas(State(state): State<AppState>) -> Json<Vec<Schema>> {
    Json(state.registry.schemas().into_iter().cloned().collect())
}

pub async fn get_schema(
    State(state): State<AppState>,
    Path(model): Path<String>,
) -> Result<Json<Schema>, AppError> {
    let provider = state.provider(&model)?;
    Ok(Json(provider.schema().clone()))
}
