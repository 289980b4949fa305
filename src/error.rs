//! Typed errors and HTTP mapping.
//!
//! [`AppError`] is the single failure value crossing the CRUD contract. Its
//! wrapped cause is kept for logs only: the [`Serialize`] impl writes `type`,
//! `message` and `details`, never the status code or the cause.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Boxed cause carried by internal errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by every contract operation.
pub type AppResult<T> = Result<T, AppError>;

/// Closed set of failure classes, each with a fixed status and type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Validation,
    BadRequest,
    Unauthorized,
    Forbidden,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation | ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::Conflict => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Machine-readable tag written as `type` in the client body.
    pub const fn type_tag(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation_error",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Internal => "internal_error",
        }
    }

    const fn default_message(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "Resource not found",
            ErrorKind::Validation => "Validation failed",
            ErrorKind::BadRequest => "Bad request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::Internal => "An internal error occurred",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Structured application error. Immutable once built.
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    details: Option<BTreeMap<String, String>>,
    source: Option<BoxError>,
}

impl AppError {
    fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// 404 with message `"<resource> not found"`.
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::new(ErrorKind::NotFound, format!("{} not found", resource))
    }

    /// 400 carrying one note per offending field.
    pub fn validation(details: BTreeMap<String, String>) -> Self {
        Self {
            details: Some(details),
            ..Self::from(ErrorKind::Validation)
        }
    }

    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// 500 with a generic message; `cause` is kept for logs only.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self {
            source: Some(cause.into()),
            ..Self::from(ErrorKind::Internal)
        }
    }

    /// 500 with a caller-chosen message; `cause` is kept for logs only.
    pub fn internal_with_message(
        message: impl Into<Cow<'static, str>>,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self {
            source: Some(cause.into()),
            ..Self::new(ErrorKind::Internal, message)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn type_tag(&self) -> &'static str {
        self.kind.type_tag()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&BTreeMap<String, String>> {
        self.details.as_ref()
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<ErrorKind> for AppError {
    /// Bare error of `kind` with its default message and no cause.
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder.field("kind", &self.kind);
        builder.field("message", &self.message);
        if let Some(details) = &self.details {
            builder.field("details", details);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {}", self.message, source),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Client-facing body. The only shape an `AppError` is ever serialized to.
#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    type_: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a BTreeMap<String, String>>,
}

impl Serialize for AppError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorBody {
            type_: self.kind.type_tag(),
            message: &self.message,
            details: self.details.as_ref().filter(|d| !d.is_empty()),
        }
        .serialize(serializer)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            tracing::error!(error = %self, kind = %self.kind, "request failed");
        } else {
            tracing::debug!(error = %self, kind = %self.kind, "request rejected");
        }
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("invalid cors setting {key}: {reason}")]
    Cors { key: &'static str, reason: String },
}

/// Raised when a provider is registered with an unusable schema.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid model name '{0}': expected lowercase [a-z0-9_-]")]
    InvalidName(String),
    #[error("model '{model}': duplicate field '{field}'")]
    DuplicateField { model: String, field: String },
    #[error("model '{model}': {list} references unknown field '{field}'")]
    UnknownField {
        model: String,
        list: &'static str,
        field: String,
    },
    #[error("model '{model}': enum field '{field}' has no values")]
    EmptyEnum { model: String, field: String },
    #[error("model '{model}': field '{field}' lists enum values but is not an enum")]
    StrayEnumValues { model: String, field: String },
    #[error("provider reports model '{provider}' but schema is named '{schema}'")]
    NameMismatch { provider: String, schema: String },
    #[error("model '{0}' is already registered")]
    DuplicateModel(String),
    #[error("model '{0}' needs a string 'id' field")]
    MissingIdField(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::internal(err)
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::internal(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let conflict = match &err {
            sqlx::Error::RowNotFound => return AppError::not_found("record"),
            sqlx::Error::Database(db) if db.is_unique_violation() => Some("duplicate key value"),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Some("foreign key violation")
            }
            _ => None,
        };
        match conflict {
            Some(message) => {
                tracing::debug!(error = %err, "database conflict");
                AppError::conflict(message)
            }
            None => AppError::internal_with_message("Database error", err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("invalid JSON payload: {}", err))
        } else {
            AppError::internal(err)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn details(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn kinds_map_to_status_and_tag() {
        let cases = [
            (AppError::not_found("user"), 404, "not_found"),
            (AppError::validation(details(&[("a", "b")])), 400, "validation_error"),
            (AppError::bad_request("x"), 400, "bad_request"),
            (AppError::unauthorized("x"), 401, "unauthorized"),
            (AppError::forbidden("x"), 403, "forbidden"),
            (AppError::conflict("x"), 409, "conflict"),
            (AppError::internal("boom"), 500, "internal_error"),
        ];
        for (err, status, tag) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.type_tag(), tag);
        }
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(AppError::not_found("user 42").message(), "user 42 not found");
    }

    #[test]
    fn validation_serializes_to_client_shape() {
        let err = AppError::validation(details(&[("email", "required")]));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "validation_error",
                "message": "Validation failed",
                "details": { "email": "required" }
            })
        );
    }

    #[test]
    fn internal_cause_never_serialized() {
        let err = AppError::internal("password=hunter2 leaked from driver");
        let text = serde_json::to_string(&err).unwrap();
        assert!(!text.contains("hunter2"));
        assert!(!text.contains("code"));
        assert!(!text.contains("details"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&text).unwrap(),
            serde_json::json!({ "type": "internal_error", "message": "An internal error occurred" })
        );
    }

    #[test]
    fn display_includes_cause_for_logs() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = AppError::internal_with_message("could not save", io);
        assert_eq!(err.to_string(), "could not save: disk full");
        assert!(err.source().is_some());
    }

    #[test]
    fn internal_without_cause_renders_message() {
        let err = AppError::from(ErrorKind::Internal);
        assert!(!err.message().is_empty());
        assert_eq!(err.to_string(), "An internal error occurred");
        assert!(err.source().is_none());
    }

    #[test]
    fn only_validation_carries_details() {
        assert!(AppError::bad_request("x").details().is_none());
        assert!(AppError::internal("x").details().is_none());
        let err = AppError::validation(BTreeMap::new());
        let json = serde_json::to_value(&err).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn serde_json_errors_become_bad_request() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{nope")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn row_not_found_becomes_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.message(), "Database error");
    }

    #[test]
    fn schema_errors_are_internal() {
        let err: AppError = SchemaError::DuplicateModel("users".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("users"));
        assert!(!serde_json::to_string(&err).unwrap().contains("users"));
    }

    #[tokio::test]
    async fn into_response_uses_status_and_body() {
        let response = AppError::conflict("email taken").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "type": "conflict", "message": "email taken" }));
    }
}
