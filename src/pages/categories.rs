//! Category pages and the category picker

use std::sync::Arc;

use async_trait::async_trait;

use super::list::{ListPage, ListSource, RowDelete};
use crate::{
    config::UiConfig,
    error::AppResult,
    models::{Category, Id, Paginated},
    services::{categories::CategoriesService, ListQuery, Services},
    widgets::{LoadRequest, OptionSource, OptionsPage, SelectOption},
};

pub struct CategorySource {
    categories: CategoriesService,
}

#[async_trait]
impl ListSource for CategorySource {
    type Row = Category;
    type Filter = ();

    fn name(&self) -> &'static str {
        "categories"
    }

    async fn fetch_page(&self, query: &ListQuery) -> AppResult<Paginated<Category>> {
        self.categories.list(query).await
    }
}

#[async_trait]
impl RowDelete for CategorySource {
    async fn delete_row(&self, id: Id) -> AppResult<()> {
        self.categories.delete(id).await
    }
}

pub type CategoryListPage = ListPage<CategorySource>;

pub fn category_list_page(services: &Services, ui: &UiConfig) -> CategoryListPage {
    let source = CategorySource {
        categories: services.categories.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}

/// Option for a category, shared by the book filter and the CSV import
pub fn category_option(category: Category) -> SelectOption<Category> {
    SelectOption::new(category.id.to_string(), category.name.clone(), category)
}

pub struct CategoryOptions {
    categories: CategoriesService,
    per_page: u32,
}

impl CategoryOptions {
    pub fn new(services: &Services, ui: &UiConfig) -> Self {
        Self {
            categories: services.categories.clone(),
            per_page: ui.select_page_size,
        }
    }
}

#[async_trait]
impl OptionSource for CategoryOptions {
    type Item = Category;

    async fn load_options(&self, request: LoadRequest) -> AppResult<OptionsPage<Category>> {
        let query = ListQuery::new(request.page, self.per_page).with_search(request.keyword);
        let page = self.categories.list(&query).await?;
        Ok(OptionsPage::from_page(page, category_option))
    }
}
