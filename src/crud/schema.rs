//! Schema description format consumed by the admin frontend.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Closed set of field kinds the frontend knows how to render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Enum,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub readonly: bool,
    /// When false the field is accepted on create and rejected on update.
    #[serde(default = "default_true")]
    pub editable: bool,
    #[serde(default)]
    pub enum_values: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: label.into(),
            required: false,
            readonly: false,
            editable: true,
            enum_values: Vec::new(),
        }
    }

    pub fn enumeration<I, S>(name: impl Into<String>, label: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_values: values.into_iter().map(Into::into).collect(),
            ..Self::new(name, FieldType::Enum, label)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Server-managed: never accepted as input.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self.editable = false;
        self
    }

    /// Settable on create only.
    pub fn immutable(mut self) -> Self {
        self.editable = false;
        self
    }
}

/// Static per-module descriptor. Built once at registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub name: String,
    pub display_name: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub filterable: Vec<String>,
    #[serde(default)]
    pub searchable: Vec<String>,
}

impl Schema {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            fields: Vec::new(),
            filterable: Vec::new(),
            searchable: Vec::new(),
        }
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn filterable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn searchable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_filterable(&self, name: &str) -> bool {
        self.filterable.iter().any(|f| f == name)
    }

    pub fn is_searchable(&self, name: &str) -> bool {
        self.searchable.iter().any(|f| f == name)
    }

    /// Check the structural invariants a generic frontend relies on.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let name_ok = !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !name_ok {
            return Err(SchemaError::InvalidName(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    model: self.name.clone(),
                    field: field.name.clone(),
                });
            }
            match (field.field_type, field.enum_values.is_empty()) {
                (FieldType::Enum, true) => {
                    return Err(SchemaError::EmptyEnum {
                        model: self.name.clone(),
                        field: field.name.clone(),
                    })
                }
                (FieldType::Enum, false) | (_, true) => {}
                (_, false) => {
                    return Err(SchemaError::StrayEnumValues {
                        model: self.name.clone(),
                        field: field.name.clone(),
                    })
                }
            }
        }

        for (list, names) in [("filterable", &self.filterable), ("searchable", &self.searchable)] {
            if let Some(unknown) = names.iter().find(|n| !seen.contains(n.as_str())) {
                return Err(SchemaError::UnknownField {
                    model: self.name.clone(),
                    list,
                    field: unknown.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Schema {
        Schema::new("users", "Users")
            .field(Field::new("id", FieldType::String, "ID").readonly())
            .field(Field::new("email", FieldType::String, "Email Address").required().immutable())
            .field(Field::enumeration("role", "Role", ["admin", "member"]).required())
            .field(Field::new("active", FieldType::Boolean, "Active"))
            .filterable(["role", "active"])
            .searchable(["email"])
    }

    #[test]
    fn valid_schema_passes() {
        assert_eq!(users().validate(), Ok(()));
    }

    #[test]
    fn serializes_to_frontend_shape() {
        let json = serde_json::to_value(users()).unwrap();
        assert_eq!(json["displayName"], "Users");
        assert_eq!(
            json["fields"][1],
            serde_json::json!({
                "name": "email",
                "type": "string",
                "label": "Email Address",
                "required": true,
                "readonly": false,
                "editable": false,
                "enumValues": []
            })
        );
        assert_eq!(json["fields"][2]["enumValues"], serde_json::json!(["admin", "member"]));
        assert_eq!(json["filterable"], serde_json::json!(["role", "active"]));
        assert_eq!(json["searchable"], serde_json::json!(["email"]));
    }

    #[test]
    fn deserializes_with_defaults() {
        let schema: Schema = serde_json::from_str(
            r#"{"name":"tags","displayName":"Tags","fields":[{"name":"label","type":"string","label":"Label"}]}"#,
        )
        .unwrap();
        let field = &schema.fields[0];
        assert!(field.editable);
        assert!(!field.required);
        assert!(schema.filterable.is_empty());
        assert_eq!(schema.validate(), Ok(()));
    }

    #[test]
    fn readonly_implies_not_editable() {
        let field = Field::new("id", FieldType::String, "ID").readonly();
        assert!(field.readonly);
        assert!(!field.editable);
    }

    #[test]
    fn rejects_unknown_filterable() {
        let schema = users().filterable(["nickname"]);
        assert_eq!(
            schema.validate(),
            Err(SchemaError::UnknownField {
                model: "users".into(),
                list: "filterable",
                field: "nickname".into(),
            })
        );
    }

    #[test]
    fn rejects_unknown_searchable() {
        let schema = users().searchable(["bio"]);
        assert!(matches!(
            schema.validate(),
            Err(SchemaError::UnknownField { list: "searchable", .. })
        ));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let schema = users().field(Field::new("email", FieldType::String, "Email"));
        assert!(matches!(schema.validate(), Err(SchemaError::DuplicateField { .. })));
    }

    #[test]
    fn rejects_bad_enum_shapes() {
        let empty = Schema::new("x", "X").field(Field::enumeration("s", "S", Vec::<String>::new()));
        assert!(matches!(empty.validate(), Err(SchemaError::EmptyEnum { .. })));

        let mut stray = Field::new("n", FieldType::Number, "N");
        stray.enum_values = vec!["1".into()];
        let schema = Schema::new("x", "X").field(stray);
        assert!(matches!(schema.validate(), Err(SchemaError::StrayEnumValues { .. })));
    }

    #[test]
    fn rejects_non_lowercase_names() {
        for name in ["", "Users", "user accounts"] {
            let schema = Schema::new(name, "Users");
            assert!(matches!(schema.validate(), Err(SchemaError::InvalidName(_))));
        }
    }
}
