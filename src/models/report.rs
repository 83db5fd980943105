//! Reporting aggregates computed by the server

use serde::{Deserialize, Serialize};

use super::Id;

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSummary {
    pub total_books: u64,
    pub total_items: u64,
    pub available_items: u64,
    pub borrowed_items: u64,
    pub total_students: u64,
    pub active_borrows: u64,
    pub overdue_borrows: u64,
}

/// Most-borrowed title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularBook {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(alias = "borrow_count")]
    pub borrows: u64,
}
