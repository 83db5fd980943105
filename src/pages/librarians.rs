//! Librarian list page

use std::sync::Arc;

use async_trait::async_trait;

use super::list::{ListPage, ListSource, RowDelete};
use crate::{
    config::UiConfig,
    error::AppResult,
    models::{Id, Librarian, Paginated},
    services::{librarians::LibrariansService, ListQuery, Services},
};

pub struct LibrarianSource {
    librarians: LibrariansService,
}

#[async_trait]
impl ListSource for LibrarianSource {
    type Row = Librarian;
    type Filter = ();

    fn name(&self) -> &'static str {
        "librarians"
    }

    async fn fetch_page(&self, query: &ListQuery) -> AppResult<Paginated<Librarian>> {
        self.librarians.list(query).await
    }
}

#[async_trait]
impl RowDelete for LibrarianSource {
    async fn delete_row(&self, id: Id) -> AppResult<()> {
        self.librarians.delete(id).await
    }
}

pub type LibrarianListPage = ListPage<LibrarianSource>;

pub fn librarian_list_page(services: &Services, ui: &UiConfig) -> LibrarianListPage {
    let source = LibrarianSource {
        librarians: services.librarians.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}
