//! Category service

use std::sync::Arc;

use validator::Validate;

use super::query::ListQuery;
use crate::{
    api::{ApiClient, PageParams},
    error::AppResult,
    models::{category::CategoryInput, Category, Id, Paginated},
};

const PATH: &str = "categories";

#[derive(Clone)]
pub struct CategoriesService {
    api: Arc<ApiClient>,
}

impl CategoriesService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ListQuery) -> AppResult<Paginated<Category>> {
        self.api
            .get_page(PATH, &query.params(PageParams::LIMIT_KEYWORD))
            .await
    }

    pub async fn get(&self, id: Id) -> AppResult<Category> {
        self.api.get(&format!("{}/{}", PATH, id), &[]).await
    }

    pub async fn create(&self, input: &CategoryInput) -> AppResult<Category> {
        input.validate()?;
        self.api.post(PATH, input).await
    }

    pub async fn update(&self, id: Id, input: &CategoryInput) -> AppResult<Category> {
        input.validate()?;
        self.api.put(&format!("{}/{}", PATH, id), input).await
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
