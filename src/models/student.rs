//! Student (borrower) model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Id,
    #[serde(alias = "nis")]
    pub student_number: String,
    pub name: String,
    #[serde(default, alias = "class")]
    pub class_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Student {
    /// Label used in pickers: `number - name`
    pub fn label(&self) -> String {
        format!("{} - {}", self.student_number, self.name)
    }
}

/// Create/update student request; also the row shape of bulk imports
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct StudentInput {
    #[validate(length(min = 1, message = "Student number is required"))]
    pub student_number: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Bulk import rows share the create payload
pub type StudentImportRow = StudentInput;
