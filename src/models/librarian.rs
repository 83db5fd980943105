//! Librarian (staff account) model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Librarian {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Create/update librarian request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LibrarianInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Only sent on creation or when changing it
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
