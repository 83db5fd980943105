//! Book catalog models: master records (titles) and physical items (copies)

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{category::Category, Id};

/// Physical condition of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    Good,
    Fair,
    Poor,
}

impl ItemCondition {
    pub const ALL: [ItemCondition; 3] = [ItemCondition::Good, ItemCondition::Fair, ItemCondition::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCondition::Good => "good",
            ItemCondition::Fair => "fair",
            ItemCondition::Poor => "poor",
        }
    }
}

impl std::fmt::Display for ItemCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemCondition::Good => "Good",
            ItemCondition::Fair => "Fair",
            ItemCondition::Poor => "Poor",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for ItemCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(ItemCondition::Good),
            "fair" => Ok(ItemCondition::Fair),
            "poor" => Ok(ItemCondition::Poor),
            other => Err(format!("Unknown condition '{}'", other)),
        }
    }
}

/// Availability status of a copy, maintained by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Available,
    Borrowed,
    Lost,
    Damaged,
    Maintenance,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Borrowed => "borrowed",
            ItemStatus::Lost => "lost",
            ItemStatus::Damaged => "damaged",
            ItemStatus::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ItemStatus::Available => "Available",
            ItemStatus::Borrowed => "Borrowed",
            ItemStatus::Lost => "Lost",
            ItemStatus::Damaged => "Damaged",
            ItemStatus::Maintenance => "Maintenance",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(ItemStatus::Available),
            "borrowed" => Ok(ItemStatus::Borrowed),
            "lost" => Ok(ItemStatus::Lost),
            "damaged" => Ok(ItemStatus::Damaged),
            "maintenance" => Ok(ItemStatus::Maintenance),
            other => Err(format!("Unknown status '{}'", other)),
        }
    }
}

/// Catalogued title, independent of its physical copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMaster {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default, alias = "year")]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub total_items: Option<u32>,
    #[serde(default)]
    pub available_items: Option<u32>,
}

/// Short form of a master embedded in item payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// One physical, trackable copy of a master
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookItem {
    pub id: Id,
    #[serde(default)]
    pub book_master_id: Option<Id>,
    pub code: String,
    pub condition: ItemCondition,
    pub status: ItemStatus,
    #[serde(default, alias = "book_master")]
    pub book: Option<BookSummary>,
}

impl BookItem {
    /// Label used in pickers and tables: `code - title`
    pub fn label(&self) -> String {
        match &self.book {
            Some(book) => format!("{} - {}", self.code, book.title),
            None => self.code.clone(),
        }
    }
}

/// Create/update book master request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct BookMasterInput {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[validate(range(min = 1000, max = 9999, message = "Year must have four digits"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    pub category_id: Id,
}

/// Create/update book item request
#[derive(Debug, Clone, Serialize, Validate)]
pub struct BookItemInput {
    pub book_master_id: Id,
    #[validate(length(min = 1, message = "Item code is required"))]
    pub code: String,
    pub condition: ItemCondition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

/// Row of a bulk book import
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookImportRow {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub publication_year: Option<i32>,
    pub isbn: String,
    pub category_id: Id,
    pub good_qty: u32,
    pub fair_qty: u32,
    pub poor_qty: u32,
}

/// Server summary returned by bulk imports
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportSummary {
    #[serde(default, alias = "created")]
    pub imported: u32,
    #[serde(default)]
    pub skipped: u32,
}
