//! Librarian (staff) service

use std::sync::Arc;

use validator::Validate;

use super::query::ListQuery;
use crate::{
    api::{ApiClient, PageParams},
    error::AppResult,
    models::{librarian::LibrarianInput, Id, Librarian, Paginated},
};

const PATH: &str = "librarians";

#[derive(Clone)]
pub struct LibrariansService {
    api: Arc<ApiClient>,
}

impl LibrariansService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Paginated<Librarian>> {
        self.api
            .get_page(PATH, &query.params(PageParams::PER_PAGE_SEARCH))
            .await
    }

    pub async fn get(&self, id: Id) -> AppResult<Librarian> {
        self.api.get(&format!("{}/{}", PATH, id), &[]).await
    }

    pub async fn create(&self, input: &LibrarianInput) -> AppResult<Librarian> {
        input.validate()?;
        self.api.post(PATH, input).await
    }

    pub async fn update(&self, id: Id, input: &LibrarianInput) -> AppResult<Librarian> {
        input.validate()?;
        self.api.put(&format!("{}/{}", PATH, id), input).await
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
