//! Shared interaction widgets, modelled as state machines independent of any renderer

pub mod async_select;
pub mod debounce;
pub mod dialog;
pub mod notice;
pub mod pagination;
pub mod request;

pub use async_select::{AsyncSelect, LoadRequest, OptionSource, OptionsPage, SelectOption, SelectState};
pub use debounce::Debouncer;
pub use dialog::ConfirmDialog;
pub use notice::{Notice, NoticeLevel, Notices};
pub use pagination::{PageItem, Pagination};
pub use request::{RequestTracker, Ticket};
