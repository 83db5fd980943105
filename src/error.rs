//! Error types for the library admin client

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Field-level validation errors, keyed by field name in the order the server reported them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(pub IndexMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a single field/message pair
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Flatten to one message per field, joining multiple messages for the same field
    pub fn messages(&self) -> Vec<String> {
        self.0
            .iter()
            .filter_map(|(field, messages)| {
                let text = messages
                    .iter()
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if text.is_empty() {
                    None
                } else if mentions_field(&text, field) {
                    Some(text)
                } else {
                    Some(format!("{}: {}", field, text))
                }
            })
            .collect()
    }
}

/// Whether a message already names its field; `books.0.isbn` is named by `isbn`
fn mentions_field(message: &str, field: &str) -> bool {
    let name = field.rsplit('.').next().unwrap_or(field).replace('_', " ");
    message.to_lowercase().contains(&name.to_lowercase())
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.add(field.to_string(), message);
            }
        }
        fields
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {message}")]
    Api { status: Option<u16>, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Session error: {0}")]
    Session(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.into())
    }
}

impl AppError {
    /// Generic API failure with only a message
    pub fn api(message: impl Into<String>) -> Self {
        AppError::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Messages suitable for user-facing notices.
    ///
    /// Validation errors yield one message per field; everything else yields a single
    /// message, falling back to `fallback` when the server gave nothing usable.
    pub fn user_messages(&self, fallback: &str) -> Vec<String> {
        match self {
            AppError::Validation(fields) if !fields.is_empty() => fields.messages(),
            AppError::Api { message, .. }
            | AppError::Unauthorized(message)
            | AppError::NotFound(message)
            | AppError::Session(message)
                if !message.trim().is_empty() =>
            {
                vec![message.clone()]
            }
            _ => vec![fallback.to_string()],
        }
    }

    /// Single message for forms that show one error line
    pub fn user_message(&self, fallback: &str) -> String {
        self.user_messages(fallback).join(" ")
    }
}

/// Result type alias for client operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_one_per_field_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("isbn", "The isbn has already been taken.");
        errors.add("title", "Required");
        errors.add("title", "Too short");

        assert_eq!(
            errors.messages(),
            vec![
                "The isbn has already been taken.".to_string(),
                "title: Required Too short".to_string(),
            ]
        );
    }

    #[test]
    fn test_user_messages_fallback() {
        let err = AppError::api("   ");
        assert_eq!(err.user_messages("Something went wrong"), vec!["Something went wrong"]);

        let err = AppError::api("Item not available");
        assert_eq!(err.user_message("fallback"), "Item not available");

        let err = AppError::Validation(FieldErrors::new());
        assert_eq!(err.user_messages("fallback"), vec!["fallback"]);
    }

    #[test]
    fn test_deserialize_server_error_map() {
        let errors: FieldErrors = serde_json::from_str(
            r#"{"rows.0.title": ["The title field is required."], "rows.1.isbn": ["Duplicate"]}"#,
        )
        .unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("rows.1.isbn"), Some(&["Duplicate".to_string()][..]));
    }
}
