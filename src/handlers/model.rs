//! Generic record handlers: list, create, read, update, delete.

use crate::crud::{Data, Filters};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";

fn body_to_data(body: Result<Json<Value>, JsonRejection>) -> Result<Data, AppError> {
    let Json(value) = body?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::bad_request("body must be a JSON object")),
    }
}

/// Missing means 1 for page and 0 (provider default) for limit; anything non-integer is rejected.
fn take_int(params: &mut Filters, key: &'static str, missing: i64) -> Result<i64, AppError> {
    match params.remove(key) {
        None => Ok(missing),
        Some(raw) if raw.trim().is_empty() => Ok(missing),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::bad_request(format!("{} must be an integer", key))),
    }
}

pub async fn list(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(mut params): Query<Filters>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state.provider(&model)?;
    let page = take_int(&mut params, PAGE_PARAM, 1)?;
    let limit = take_int(&mut params, LIMIT_PARAM, 0)?;
    let res = provider.list(&params, page, limit).await?;
    Ok(Json(res))
}

pub async fn create(
    State(state): State<AppState>,
    Path(model): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state.provider(&model)?;
    let data = body_to_data(body)?;
    let record = provider.create(data).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state.provider(&model)?;
    let record = provider.get(&id).await?;
    Ok(Json(record))
}

pub async fn update(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state.provider(&model)?;
    let data = body_to_data(body)?;
    let record = provider.update(&id, data).await?;
    Ok(Json(record))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let provider = state.provider(&model)?;
    provider.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
