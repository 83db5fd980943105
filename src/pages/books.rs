//! Book pages: title list, title detail with its copies, and the available-copy picker

use std::sync::Arc;

use async_trait::async_trait;

use super::list::{ListPage, ListSource, RowDelete};
use crate::{
    config::UiConfig,
    error::AppResult,
    models::{BookItem, BookMaster, Id, Paginated},
    services::{
        books::{BookFilter, BookItemFilter, BooksService},
        ListQuery, Services,
    },
    widgets::{LoadRequest, Notices, OptionSource, OptionsPage, SelectOption},
};

pub struct BookSource {
    books: BooksService,
}

#[async_trait]
impl ListSource for BookSource {
    type Row = BookMaster;
    type Filter = BookFilter;

    fn name(&self) -> &'static str {
        "books"
    }

    async fn fetch_page(&self, query: &ListQuery<BookFilter>) -> AppResult<Paginated<BookMaster>> {
        self.books.list_masters(query).await
    }
}

#[async_trait]
impl RowDelete for BookSource {
    async fn delete_row(&self, id: Id) -> AppResult<()> {
        self.books.delete_master(id).await
    }
}

pub type BookListPage = ListPage<BookSource>;

pub fn book_list_page(services: &Services, ui: &UiConfig) -> BookListPage {
    let source = BookSource {
        books: services.books.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}

pub struct BookItemSource {
    books: BooksService,
}

#[async_trait]
impl ListSource for BookItemSource {
    type Row = BookItem;
    type Filter = BookItemFilter;

    fn name(&self) -> &'static str {
        "book items"
    }

    async fn fetch_page(&self, query: &ListQuery<BookItemFilter>) -> AppResult<Paginated<BookItem>> {
        self.books.list_items(query).await
    }
}

#[async_trait]
impl RowDelete for BookItemSource {
    async fn delete_row(&self, id: Id) -> AppResult<()> {
        self.books.delete_item(id).await
    }
}

pub type BookItemListPage = ListPage<BookItemSource>;

pub fn book_item_list_page(services: &Services, ui: &UiConfig) -> BookItemListPage {
    let source = BookItemSource {
        books: services.books.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}

/// One title with its physical copies
pub struct BookDetailPage {
    books: BooksService,
    pub master: Option<BookMaster>,
    pub items: BookItemListPage,
    pub loading: bool,
    pub notices: Notices,
}

impl BookDetailPage {
    pub fn new(services: &Services, ui: &UiConfig) -> Self {
        Self {
            books: services.books.clone(),
            master: None,
            items: book_item_list_page(services, ui),
            loading: false,
            notices: Notices::new(),
        }
    }

    /// Load the title, then the first page of its copies
    pub async fn load(&mut self, id: Id) {
        self.loading = true;
        match self.books.get_master(id).await {
            Ok(master) => {
                self.master = Some(master);
                self.items.list.set_filter(BookItemFilter {
                    book_master_id: Some(id),
                    ..BookItemFilter::default()
                });
                self.items.list.refresh().await;
            }
            Err(e) => {
                tracing::error!("Failed to load book {}: {}", id, e);
                self.notices.report(&e, "Failed to load book");
                self.master = None;
            }
        }
        self.loading = false;
    }
}

/// Copies currently available for borrowing, for the borrow form picker
pub struct AvailableItemOptions {
    books: BooksService,
    per_page: u32,
}

impl AvailableItemOptions {
    pub fn new(services: &Services, ui: &UiConfig) -> Self {
        Self {
            books: services.books.clone(),
            per_page: ui.select_page_size,
        }
    }
}

#[async_trait]
impl OptionSource for AvailableItemOptions {
    type Item = BookItem;

    async fn load_options(&self, request: LoadRequest) -> AppResult<OptionsPage<BookItem>> {
        let page = self
            .books
            .available_items(request.page, self.per_page, &request.keyword)
            .await?;
        Ok(OptionsPage::from_page(page, |item| {
            SelectOption::new(item.id.to_string(), item.label(), item)
        }))
    }
}
