//! In-memory `CrudProvider` over JSON records.
//!
//! Stores records in insertion order behind an `RwLock`. The schema must declare a
//! string `id` field. A readonly `id` is always a fresh UUID v4; an input `id` is taken
//! from the payload, or generated when absent, and must be unique. Readonly
//! `created_at`/`updated_at` date fields get RFC 3339 UTC timestamps. All mutations
//! run under the write lock, so an update that races a committed delete fails with
//! not-found.

use crate::crud::{CrudProvider, Data, FieldType, Filters, ListFilters, ListResponse, Pagination, Record, Schema};
use crate::error::{AppError, AppResult, SchemaError};
use crate::service::RequestValidator;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub const ID_FIELD: &str = "id";
const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";

pub struct MemoryProvider {
    schema: Schema,
    records: RwLock<Vec<Data>>,
}

impl MemoryProvider {
    /// Fails when the schema has no string `id` field to address records by.
    pub fn new(schema: Schema) -> Result<Self, SchemaError> {
        match schema.get_field(ID_FIELD) {
            Some(f) if f.field_type == FieldType::String => {}
            _ => return Err(SchemaError::MissingIdField(schema.name.clone())),
        }
        Ok(Self {
            schema,
            records: RwLock::new(Vec::new()),
        })
    }

    pub fn len(&self) -> AppResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> AppResult<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Vec<Data>>> {
        self.records
            .read()
            .map_err(|_| AppError::internal(format!("{} store lock poisoned", self.schema.name)))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Vec<Data>>> {
        self.records
            .write()
            .map_err(|_| AppError::internal(format!("{} store lock poisoned", self.schema.name)))
    }

    fn manages(&self, name: &str) -> bool {
        self.schema.get_field(name).is_some_and(|f| f.readonly)
    }

    fn manages_timestamp(&self, name: &str) -> bool {
        self.schema
            .get_field(name)
            .is_some_and(|f| f.readonly && f.field_type == FieldType::Date)
    }

    fn not_found(&self, id: &str) -> AppError {
        AppError::not_found(format!("{} '{}'", self.schema.name, id))
    }
}

fn id_of(record: &Data) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

#[async_trait]
impl CrudProvider for MemoryProvider {
    fn model_name(&self) -> &str {
        &self.schema.name
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn list(&self, filters: &Filters, page: i64, limit: i64) -> AppResult<ListResponse> {
        let window = Pagination::clamp(page, limit);
        let filters = ListFilters::from_query(&self.schema, filters);
        let matches: Vec<Record> = self
            .read()?
            .iter()
            .map(|r| Value::Object(r.clone()))
            .filter(|r| filters.matches(r))
            .collect();
        tracing::debug!(
            model = %self.schema.name,
            conditions = filters.conditions().len(),
            matched = matches.len(),
            page = window.page(),
            limit = window.limit(),
            "list"
        );
        Ok(window.apply(matches))
    }

    async fn get(&self, id: &str) -> AppResult<Record> {
        self.read()?
            .iter()
            .find(|r| id_of(r) == Some(id))
            .map(|r| Value::Object(r.clone()))
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, data: Data) -> AppResult<Record> {
        let mut record = RequestValidator::validate_create(&self.schema, data)?;
        let id = match id_of(&record) {
            Some(given) if !given.is_empty() && !self.manages(ID_FIELD) => given.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        };
        record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        let now = chrono::Utc::now().to_rfc3339();
        for stamp in [CREATED_AT, UPDATED_AT] {
            if self.manages_timestamp(stamp) {
                record.insert(stamp.to_string(), Value::String(now.clone()));
            }
        }
        let mut records = self.write()?;
        if records.iter().any(|r| id_of(r) == Some(id.as_str())) {
            return Err(AppError::conflict(format!(
                "{} '{}' already exists",
                self.schema.name, id
            )));
        }
        records.push(record.clone());
        tracing::debug!(model = %self.schema.name, id = %id, "created");
        Ok(Value::Object(record))
    }

    async fn update(&self, id: &str, data: Data) -> AppResult<Record> {
        let changes = RequestValidator::validate_update(&self.schema, data)?;
        let mut records = self.write()?;
        let record = records
            .iter_mut()
            .find(|r| id_of(r) == Some(id))
            .ok_or_else(|| self.not_found(id))?;
        for (key, value) in changes {
            record.insert(key, value);
        }
        if self.manages_timestamp(UPDATED_AT) {
            record.insert(
                UPDATED_AT.to_string(),
                Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        tracing::debug!(model = %self.schema.name, id = %id, "updated");
        Ok(Value::Object(record.clone()))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut records = self.write()?;
        let pos = records
            .iter()
            .position(|r| id_of(r) == Some(id))
            .ok_or_else(|| self.not_found(id))?;
        records.remove(pos);
        tracing::debug!(model = %self.schema.name, id = %id, "deleted");
        Ok(())
    }
}
