//! Book catalog service: masters, physical items and bulk import

use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use super::query::{push_opt, ListFilter, ListQuery};
use crate::{
    api::{ApiClient, PageParams},
    error::AppResult,
    models::{
        book::{BookImportRow, BookItemInput, BookMasterInput, ImportSummary},
        BookItem, BookMaster, Id, ItemCondition, ItemStatus, Paginated,
    },
};

const MASTERS_PATH: &str = "book-masters";
const ITEMS_PATH: &str = "book-items";

/// Filters of the book list page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub category_id: Option<Id>,
}

impl ListFilter for BookFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>) {
        push_opt(params, "category_id", self.category_id);
    }
}

/// Filters of the item list (copies of one title, or all available copies)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookItemFilter {
    pub book_master_id: Option<Id>,
    pub status: Option<ItemStatus>,
    pub condition: Option<ItemCondition>,
}

impl ListFilter for BookItemFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>) {
        push_opt(params, "book_master_id", self.book_master_id);
        push_opt(params, "status", self.status.map(|s| s.as_str()));
        push_opt(params, "condition", self.condition.map(|c| c.as_str()));
    }
}

#[derive(Serialize)]
struct BookImportBatch<'a> {
    books: &'a [BookImportRow],
}

#[derive(Clone)]
pub struct BooksService {
    api: Arc<ApiClient>,
}

impl BooksService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// List catalogued titles
    pub async fn list_masters(&self, query: &ListQuery<BookFilter>) -> AppResult<Paginated<BookMaster>> {
        self.api
            .get_page(MASTERS_PATH, &query.params(PageParams::LIMIT_KEYWORD))
            .await
    }

    pub async fn get_master(&self, id: Id) -> AppResult<BookMaster> {
        self.api.get(&format!("{}/{}", MASTERS_PATH, id), &[]).await
    }

    pub async fn create_master(&self, input: &BookMasterInput) -> AppResult<BookMaster> {
        input.validate()?;
        self.api.post(MASTERS_PATH, input).await
    }

    pub async fn update_master(&self, id: Id, input: &BookMasterInput) -> AppResult<BookMaster> {
        input.validate()?;
        self.api.put(&format!("{}/{}", MASTERS_PATH, id), input).await
    }

    pub async fn delete_master(&self, id: Id) -> AppResult<()> {
        self.api.delete(&format!("{}/{}", MASTERS_PATH, id)).await
    }

    /// List physical copies
    pub async fn list_items(&self, query: &ListQuery<BookItemFilter>) -> AppResult<Paginated<BookItem>> {
        self.api
            .get_page(ITEMS_PATH, &query.params(PageParams::PER_PAGE_SEARCH))
            .await
    }

    /// Copies that can currently be borrowed
    pub async fn available_items(&self, page: u32, per_page: u32, keyword: &str) -> AppResult<Paginated<BookItem>> {
        let query = ListQuery::new(page, per_page)
            .with_search(keyword)
            .with_filter(BookItemFilter {
                status: Some(ItemStatus::Available),
                ..BookItemFilter::default()
            });
        self.list_items(&query).await
    }

    pub async fn get_item(&self, id: Id) -> AppResult<BookItem> {
        self.api.get(&format!("{}/{}", ITEMS_PATH, id), &[]).await
    }

    pub async fn create_item(&self, input: &BookItemInput) -> AppResult<BookItem> {
        input.validate()?;
        self.api.post(ITEMS_PATH, input).await
    }

    pub async fn update_item(&self, id: Id, input: &BookItemInput) -> AppResult<BookItem> {
        input.validate()?;
        self.api.put(&format!("{}/{}", ITEMS_PATH, id), input).await
    }

    pub async fn delete_item(&self, id: Id) -> AppResult<()> {
        self.api.delete(&format!("{}/{}", ITEMS_PATH, id)).await
    }

    /// Create titles and their copies in one batch
    pub async fn import(&self, rows: &[BookImportRow]) -> AppResult<ImportSummary> {
        tracing::info!("Importing {} book rows", rows.len());
        self.api
            .post(&format!("{}/import", MASTERS_PATH), &BookImportBatch { books: rows })
            .await
    }
}
