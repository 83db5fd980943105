//! Transaction forms composed from user-picked entities

pub mod borrow;
pub mod returns;

pub use borrow::BorrowForm;
pub use returns::{ReturnForm, ReturnLine};
