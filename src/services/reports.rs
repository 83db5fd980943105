//! Reporting service; all aggregation happens server-side

use std::sync::Arc;

use super::query::ListQuery;
use crate::{
    api::{ApiClient, PageParams},
    error::AppResult,
    models::{BorrowTransaction, DashboardSummary, Paginated, PopularBook},
};

#[derive(Clone)]
pub struct ReportsService {
    api: Arc<ApiClient>,
}

impl ReportsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn dashboard(&self) -> AppResult<DashboardSummary> {
        self.api.get("reports/dashboard", &[]).await
    }

    /// Borrow transactions past their due date
    pub async fn overdue(&self, query: &ListQuery) -> AppResult<Paginated<BorrowTransaction>> {
        self.api
            .get_page("reports/overdue", &query.params(PageParams::PER_PAGE_SEARCH))
            .await
    }

    pub async fn popular_books(&self, limit: u32) -> AppResult<Vec<PopularBook>> {
        self.api
            .get(
                "reports/popular-books",
                &[("limit".to_string(), limit.to_string())],
            )
            .await
    }
}
