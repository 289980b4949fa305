//! The capability set a module implements to be managed by the admin surface.

use crate::crud::{ListResponse, Schema};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Opaque record returned by a provider.
pub type Record = Value;

/// Untyped create/update payload.
pub type Data = Map<String, Value>;

/// Filter map taken verbatim from the caller.
pub type Filters = HashMap<String, String>;

/// Uniform CRUD surface over one module.
///
/// Implementations own their storage. Every failure is an [`AppError`] so the
/// hosting layer can render it without knowing which module raised it.
#[async_trait]
pub trait CrudProvider: Send + Sync {
    /// Routing key, e.g. `"users"`. Constant for the provider's lifetime.
    fn model_name(&self) -> &str;

    /// Static schema; calling it has no side effects.
    fn schema(&self) -> &Schema;

    /// Filtered, paginated listing. Unknown filter keys are ignored and
    /// `page`/`limit` are clamped (see [`crate::crud::Pagination::clamp`]).
    async fn list(&self, filters: &Filters, page: i64, limit: i64) -> AppResult<ListResponse>;

    async fn get(&self, id: &str) -> AppResult<Record>;

    async fn create(&self, data: Data) -> AppResult<Record>;

    /// Partial update: fields absent from `data` are left unchanged.
    async fn update(&self, id: &str, data: Data) -> AppResult<Record>;

    /// Fails with not-found when `id` is absent, including on a repeated delete.
    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// Convert a module's typed record into the dynamic form returned across the contract.
pub fn to_record<T: Serialize>(value: &T) -> AppResult<Record> {
    serde_json::to_value(value).map_err(AppError::internal)
}

/// Convert a validated payload into a module's typed input.
pub fn from_data<T: DeserializeOwned>(data: Data) -> AppResult<T> {
    serde_json::from_value(Value::Object(data))
        .map_err(|e| AppError::bad_request(format!("invalid payload: {}", e)))
}
