//! Request validation from schema field rules.

use crate::crud::{Data, Field, FieldType, Schema};
use crate::error::AppError;
use serde_json::Value;
use std::collections::BTreeMap;

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create payload. Every required field must be present and non-empty,
    /// readonly fields must be absent, and any other value present must fit its type
    /// (an empty string is not a valid enum, date, number or boolean). Returns the
    /// payload with unknown keys dropped.
    pub fn validate_create(schema: &Schema, data: Data) -> Result<Data, AppError> {
        let mut errors = BTreeMap::new();
        for field in &schema.fields {
            let value = data.get(&field.name);
            if field.readonly {
                if value.is_some() {
                    errors.insert(field.name.clone(), "read-only".to_string());
                }
                continue;
            }
            match value {
                Some(v) if !is_empty(v) => {
                    if let Err(note) = check_type(field, v) {
                        errors.insert(field.name.clone(), note);
                    }
                }
                _ if field.required => {
                    errors.insert(field.name.clone(), "required".to_string());
                }
                Some(v) => {
                    if let Err(note) = check_type(field, v) {
                        errors.insert(field.name.clone(), note);
                    }
                }
                None => {}
            }
        }
        finish(schema, data, errors)
    }

    /// Validate an update payload. Only fields present are checked; readonly and
    /// non-editable fields are rejected. Returns the payload with unknown keys dropped.
    pub fn validate_update(schema: &Schema, data: Data) -> Result<Data, AppError> {
        let mut errors = BTreeMap::new();
        for (key, value) in &data {
            let Some(field) = schema.get_field(key) else {
                continue;
            };
            let note = if field.readonly {
                Some("read-only".to_string())
            } else if !field.editable {
                Some("not editable".to_string())
            } else if field.required && is_empty(value) {
                Some("required".to_string())
            } else {
                check_type(field, value).err()
            };
            if let Some(note) = note {
                errors.insert(key.clone(), note);
            }
        }
        finish(schema, data, errors)
    }
}

fn finish(schema: &Schema, data: Data, errors: BTreeMap<String, String>) -> Result<Data, AppError> {
    if !errors.is_empty() {
        tracing::debug!(model = %schema.name, fields = ?errors.keys().collect::<Vec<_>>(), "validation failed");
        return Err(AppError::validation(errors));
    }
    Ok(data
        .into_iter()
        .filter(|(k, _)| schema.get_field(k).is_some())
        .collect())
}

fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_type(field: &Field, v: &Value) -> Result<(), String> {
    if v.is_null() {
        return Ok(());
    }
    let ok = match field.field_type {
        FieldType::String => v.is_string(),
        FieldType::Number => v.is_number(),
        FieldType::Boolean => v.is_boolean(),
        FieldType::Date => v.as_str().is_some_and(is_date),
        FieldType::Enum => v
            .as_str()
            .is_some_and(|s| field.enum_values.iter().any(|e| e == s)),
    };
    if ok {
        return Ok(());
    }
    Err(match field.field_type {
        FieldType::String => "must be a string".to_string(),
        FieldType::Number => "must be a number".to_string(),
        FieldType::Boolean => "must be a boolean".to_string(),
        FieldType::Date => "must be a date".to_string(),
        FieldType::Enum => format!("must be one of: {}", field.enum_values.join(", ")),
    })
}

/// RFC 3339 timestamp or plain `YYYY-MM-DD`.
fn is_date(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn users() -> Schema {
        Schema::new("users", "Users")
            .field(Field::new("id", FieldType::String, "ID").readonly())
            .field(Field::new("email", FieldType::String, "Email").required().immutable())
            .field(Field::new("name", FieldType::String, "Name").required())
            .field(Field::enumeration("role", "Role", ["admin", "member"]))
            .field(Field::new("age", FieldType::Number, "Age"))
            .field(Field::new("born", FieldType::Date, "Born"))
            .field(Field::new("active", FieldType::Boolean, "Active"))
    }

    fn data(v: Value) -> Data {
        match v {
            Value::Object(m) => m,
            _ => panic!("object expected"),
        }
    }

    fn details(err: AppError) -> BTreeMap<String, String> {
        assert_eq!(err.kind(), ErrorKind::Validation);
        err.details().cloned().unwrap_or_default()
    }

    #[test]
    fn create_accepts_valid_payload_and_drops_unknown_keys() {
        let out = RequestValidator::validate_create(
            &users(),
            data(json!({ "email": "a@b.c", "name": "Ann", "role": "admin", "nickname": "annie" })),
        )
        .unwrap();
        assert!(out.contains_key("email"));
        assert!(!out.contains_key("nickname"));
    }

    #[test]
    fn create_reports_every_missing_required_field() {
        let err = RequestValidator::validate_create(&users(), data(json!({ "name": "  " }))).unwrap_err();
        let d = details(err);
        assert_eq!(d.get("email").map(String::as_str), Some("required"));
        assert_eq!(d.get("name").map(String::as_str), Some("required"));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn create_rejects_readonly_field() {
        let err = RequestValidator::validate_create(
            &users(),
            data(json!({ "id": "x", "email": "a@b.c", "name": "Ann" })),
        )
        .unwrap_err();
        assert_eq!(details(err).get("id").map(String::as_str), Some("read-only"));
    }

    #[test]
    fn create_checks_types() {
        let err = RequestValidator::validate_create(
            &users(),
            data(json!({
                "email": "a@b.c",
                "name": "Ann",
                "role": "owner",
                "age": "forty",
                "born": "yesterday",
                "active": "yes"
            })),
        )
        .unwrap_err();
        let d = details(err);
        assert_eq!(d["role"], "must be one of: admin, member");
        assert_eq!(d["age"], "must be a number");
        assert_eq!(d["born"], "must be a date");
        assert_eq!(d["active"], "must be a boolean");
    }

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        for born in ["1990-05-17", "1990-05-17T08:00:00Z", "1990-05-17T08:00:00+02:00"] {
            let ok = RequestValidator::validate_create(
                &users(),
                data(json!({ "email": "a@b.c", "name": "Ann", "born": born })),
            );
            assert!(ok.is_ok(), "{} should be a date", born);
        }
    }

    #[test]
    fn update_rejects_non_editable_and_readonly() {
        let err = RequestValidator::validate_update(
            &users(),
            data(json!({ "email": "new@b.c", "id": "y", "name": "Bo" })),
        )
        .unwrap_err();
        let d = details(err);
        assert_eq!(d["email"], "not editable");
        assert_eq!(d["id"], "read-only");
        assert!(!d.contains_key("name"));
    }

    #[test]
    fn empty_string_on_optional_field_must_fit_its_type() {
        let err = RequestValidator::validate_create(
            &users(),
            data(json!({ "email": "a@b.c", "name": "A", "role": "", "born": "", "age": "", "active": "" })),
        )
        .unwrap_err();
        let d = details(err);
        assert_eq!(d["role"], "must be one of: admin, member");
        assert_eq!(d["born"], "must be a date");
        assert_eq!(d["age"], "must be a number");
        assert_eq!(d["active"], "must be a boolean");

        let ok = RequestValidator::validate_create(&users(), data(json!({ "email": "a@b.c", "name": "A", "born": null })));
        assert!(ok.is_ok());

        let err = RequestValidator::validate_update(&users(), data(json!({ "role": "" }))).unwrap_err();
        assert_eq!(details(err)["role"], "must be one of: admin, member");
    }

    #[test]
    fn update_is_partial_but_cannot_clear_required() {
        let ok = RequestValidator::validate_update(&users(), data(json!({ "age": 41 }))).unwrap();
        assert_eq!(ok.len(), 1);

        let err = RequestValidator::validate_update(&users(), data(json!({ "name": "" }))).unwrap_err();
        assert_eq!(details(err)["name"], "required");

        let ok = RequestValidator::validate_update(&users(), data(json!({ "age": null })));
        assert!(ok.is_ok());
    }
}
