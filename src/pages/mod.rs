//! Page controllers: per-entity lists, details and the dashboard

pub mod books;
pub mod categories;
pub mod dashboard;
pub mod librarians;
pub mod list;
pub mod students;
pub mod transactions;

pub use list::{ListPage, ListSource, RemoteList, RowDelete, TableState};
