//! Borrow and return transaction models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    book::{BookItem, ItemCondition, ItemStatus},
    librarian::Librarian,
    student::Student,
    Id,
};

/// Borrow transaction status, computed server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorrowStatus {
    Borrowed,
    PartiallyReturned,
    Returned,
    Overdue,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::PartiallyReturned => "partially_returned",
            BorrowStatus::Returned => "returned",
            BorrowStatus::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowStatus::Borrowed => "Borrowed",
            BorrowStatus::PartiallyReturned => "Partially returned",
            BorrowStatus::Returned => "Returned",
            BorrowStatus::Overdue => "Overdue",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for BorrowStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "borrowed" => Ok(BorrowStatus::Borrowed),
            "partially_returned" => Ok(BorrowStatus::PartiallyReturned),
            "returned" => Ok(BorrowStatus::Returned),
            "overdue" => Ok(BorrowStatus::Overdue),
            other => Err(format!("Unknown borrow status '{}'", other)),
        }
    }
}

/// One item line of a borrow transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowedItem {
    #[serde(alias = "item")]
    pub book_item: BookItem,
    #[serde(default)]
    pub returned_at: Option<NaiveDate>,
}

impl BorrowedItem {
    pub fn is_returned(&self) -> bool {
        self.returned_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowTransaction {
    pub id: Id,
    #[serde(default)]
    pub code: Option<String>,
    pub student: Student,
    #[serde(default)]
    pub librarian: Option<Librarian>,
    #[serde(default)]
    pub items: Vec<BorrowedItem>,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: BorrowStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BorrowTransaction {
    /// Items still out on loan
    pub fn outstanding_items(&self) -> impl Iterator<Item = &BookItem> {
        self.items
            .iter()
            .filter(|line| !line.is_returned())
            .map(|line| &line.book_item)
    }
}

/// Borrow request: one student, one or more items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorrowRequest {
    pub student_id: Id,
    pub book_item_ids: Vec<Id>,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnedItem {
    pub book_item_id: Id,
    pub condition: ItemCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnTransaction {
    pub id: Id,
    pub borrow_transaction_id: Id,
    pub return_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ReturnedItem>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Return request for some or all items of a borrow transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnRequest {
    pub borrow_transaction_id: Id,
    pub return_date: NaiveDate,
    pub items: Vec<ReturnedItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
