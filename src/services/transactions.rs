//! Borrow/return transaction service

use std::sync::Arc;

use chrono::NaiveDate;

use super::query::{push_opt, ListFilter, ListQuery};
use crate::{
    api::{ApiClient, PageParams},
    error::AppResult,
    models::{
        transaction::{BorrowRequest, ReturnRequest},
        BorrowStatus, BorrowTransaction, Id, Paginated, ReturnTransaction,
    },
};

const BORROWS_PATH: &str = "borrow-transactions";
const RETURNS_PATH: &str = "return-transactions";

/// Filters of the transaction list pages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub status: Option<BorrowStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl ListFilter for TransactionFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>) {
        push_opt(params, "status", self.status.map(|s| s.as_str()));
        push_opt(params, "start_date", self.date_from.map(|d| d.format("%Y-%m-%d")));
        push_opt(params, "end_date", self.date_to.map(|d| d.format("%Y-%m-%d")));
    }
}

#[derive(Clone)]
pub struct TransactionsService {
    api: Arc<ApiClient>,
}

impl TransactionsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list_borrows(
        &self,
        query: &ListQuery<TransactionFilter>,
    ) -> AppResult<Paginated<BorrowTransaction>> {
        self.api
            .get_page(BORROWS_PATH, &query.params(PageParams::PER_PAGE_SEARCH))
            .await
    }

    pub async fn get_borrow(&self, id: Id) -> AppResult<BorrowTransaction> {
        self.api.get(&format!("{}/{}", BORROWS_PATH, id), &[]).await
    }

    /// Create a borrow transaction; availability and limits are checked server-side
    pub async fn borrow(&self, request: &BorrowRequest) -> AppResult<BorrowTransaction> {
        tracing::info!(
            "Borrowing {} item(s) for student {}",
            request.book_item_ids.len(),
            request.student_id
        );
        self.api.post(BORROWS_PATH, request).await
    }

    pub async fn list_returns(
        &self,
        query: &ListQuery<TransactionFilter>,
    ) -> AppResult<Paginated<ReturnTransaction>> {
        self.api
            .get_page(RETURNS_PATH, &query.params(PageParams::PER_PAGE_SEARCH))
            .await
    }

    pub async fn return_items(&self, request: &ReturnRequest) -> AppResult<ReturnTransaction> {
        tracing::info!(
            "Returning {} item(s) of borrow transaction {}",
            request.items.len(),
            request.borrow_transaction_id
        );
        self.api.post(RETURNS_PATH, request).await
    }
}
