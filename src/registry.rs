//! Providers keyed by model name, in registration order.

use crate::crud::{CrudProvider, Schema};
use crate::error::SchemaError;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct Registry {
    providers: Vec<Arc<dyn CrudProvider>>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider after checking its schema invariants and name uniqueness.
    pub fn register(&mut self, provider: Arc<dyn CrudProvider>) -> Result<(), SchemaError> {
        let schema = provider.schema();
        schema.validate()?;
        let name = provider.model_name();
        if schema.name != name {
            return Err(SchemaError::NameMismatch {
                provider: name.to_string(),
                schema: schema.name.clone(),
            });
        }
        if self.by_name.contains_key(name) {
            return Err(SchemaError::DuplicateModel(name.to_string()));
        }
        tracing::info!(model = %name, fields = schema.fields.len(), "registered model");
        self.by_name.insert(name.to_string(), self.providers.len());
        self.providers.push(provider);
        Ok(())
    }

    /// Builder-style [`Registry::register`].
    pub fn with(mut self, provider: Arc<dyn CrudProvider>) -> Result<Self, SchemaError> {
        self.register(provider)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CrudProvider>> {
        self.by_name.get(name).map(|&i| &self.providers[i])
    }

    pub fn schemas(&self) -> Vec<&Schema> {
        self.providers.iter().map(|p| p.schema()).collect()
    }

    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.model_name())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::{Field, FieldType};
    use crate::service::MemoryProvider;

    fn provider(name: &str) -> Arc<dyn CrudProvider> {
        Arc::new(MemoryProvider::new(
            Schema::new(name, name.to_uppercase())
                .field(Field::new("id", FieldType::String, "ID").readonly()),
        ).unwrap())
    }

    #[test]
    fn keeps_registration_order() {
        let registry = Registry::new()
            .with(provider("users"))
            .and_then(|r| r.with(provider("todos")))
            .unwrap();
        assert_eq!(registry.model_names().collect::<Vec<_>>(), ["users", "todos"]);
        assert_eq!(registry.schemas()[1].display_name, "TODOS");
        assert!(registry.get("todos").is_some());
        assert!(registry.get("tags").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = Registry::new();
        registry.register(provider("users")).unwrap();
        assert_eq!(
            registry.register(provider("users")),
            Err(SchemaError::DuplicateModel("users".into()))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn rejects_invalid_schema() {
        let bad: Arc<dyn CrudProvider> = Arc::new(MemoryProvider::new(
            Schema::new("users", "Users")
                .field(Field::new("id", FieldType::String, "ID"))
                .filterable(["email"]),
        ).unwrap());
        assert!(matches!(
            Registry::new().register(bad),
            Err(SchemaError::UnknownField { .. })
        ));
    }
}
