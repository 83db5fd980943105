//! Book category model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub books_count: Option<u64>,
}

/// Create/update category request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
