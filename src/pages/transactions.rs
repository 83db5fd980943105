//! Transaction list pages: borrows, returns and the overdue report

use std::sync::Arc;

use async_trait::async_trait;

use super::list::{ListPage, ListSource};
use crate::{
    config::UiConfig,
    error::AppResult,
    models::{BorrowTransaction, Paginated, ReturnTransaction},
    services::{
        reports::ReportsService,
        transactions::{TransactionFilter, TransactionsService},
        ListQuery, Services,
    },
};

pub struct BorrowSource {
    transactions: TransactionsService,
}

#[async_trait]
impl ListSource for BorrowSource {
    type Row = BorrowTransaction;
    type Filter = TransactionFilter;

    fn name(&self) -> &'static str {
        "borrow transactions"
    }

    async fn fetch_page(
        &self,
        query: &ListQuery<TransactionFilter>,
    ) -> AppResult<Paginated<BorrowTransaction>> {
        self.transactions.list_borrows(query).await
    }
}

pub type BorrowListPage = ListPage<BorrowSource>;

pub fn borrow_list_page(services: &Services, ui: &UiConfig) -> BorrowListPage {
    let source = BorrowSource {
        transactions: services.transactions.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}

pub struct ReturnSource {
    transactions: TransactionsService,
}

#[async_trait]
impl ListSource for ReturnSource {
    type Row = ReturnTransaction;
    type Filter = TransactionFilter;

    fn name(&self) -> &'static str {
        "return transactions"
    }

    async fn fetch_page(
        &self,
        query: &ListQuery<TransactionFilter>,
    ) -> AppResult<Paginated<ReturnTransaction>> {
        self.transactions.list_returns(query).await
    }
}

pub type ReturnListPage = ListPage<ReturnSource>;

pub fn return_list_page(services: &Services, ui: &UiConfig) -> ReturnListPage {
    let source = ReturnSource {
        transactions: services.transactions.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}

pub struct OverdueSource {
    reports: ReportsService,
}

#[async_trait]
impl ListSource for OverdueSource {
    type Row = BorrowTransaction;
    type Filter = ();

    fn name(&self) -> &'static str {
        "overdue transactions"
    }

    async fn fetch_page(&self, query: &ListQuery) -> AppResult<Paginated<BorrowTransaction>> {
        self.reports.overdue(query).await
    }
}

pub type OverdueListPage = ListPage<OverdueSource>;

pub fn overdue_list_page(services: &Services, ui: &UiConfig) -> OverdueListPage {
    let source = OverdueSource {
        reports: services.reports.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}
