//! Data models consumed from the library backend

pub mod book;
pub mod category;
pub mod librarian;
pub mod pagination;
pub mod report;
pub mod student;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use book::{BookItem, BookMaster, ItemCondition, ItemStatus};
pub use category::Category;
pub use librarian::Librarian;
pub use pagination::{ApiEnvelope, PageMeta, Paginated};
pub use report::{DashboardSummary, PopularBook};
pub use student::Student;
pub use transaction::{BorrowStatus, BorrowTransaction, ReturnTransaction};
pub use user::AuthUser;

/// Identifier type used by every backend record
pub type Id = i64;
