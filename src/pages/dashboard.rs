//! Dashboard page: counters, overdue loans and popular titles

use crate::{
    models::{BorrowTransaction, DashboardSummary, PopularBook},
    services::{reports::ReportsService, ListQuery},
    widgets::Notices,
};

const OVERDUE_PREVIEW: u32 = 5;
const POPULAR_LIMIT: u32 = 5;

pub struct DashboardPage {
    reports: ReportsService,
    pub summary: Option<DashboardSummary>,
    pub overdue: Vec<BorrowTransaction>,
    pub popular: Vec<PopularBook>,
    pub loading: bool,
    pub notices: Notices,
}

impl DashboardPage {
    pub fn new(reports: ReportsService) -> Self {
        Self {
            reports,
            summary: None,
            overdue: Vec::new(),
            popular: Vec::new(),
            loading: false,
            notices: Notices::new(),
        }
    }

    /// Load all panels concurrently; each panel fails on its own
    pub async fn load(&mut self) {
        self.loading = true;

        let overdue_query = ListQuery::new(1, OVERDUE_PREVIEW);
        let (summary, overdue, popular) = tokio::join!(
            self.reports.dashboard(),
            self.reports.overdue(&overdue_query),
            self.reports.popular_books(POPULAR_LIMIT),
        );

        match summary {
            Ok(summary) => self.summary = Some(summary),
            Err(e) => {
                tracing::error!("Failed to load dashboard summary: {}", e);
                self.notices.report(&e, "Failed to load dashboard summary");
                self.summary = None;
            }
        }

        match overdue {
            Ok(page) => self.overdue = page.rows,
            Err(e) => {
                tracing::error!("Failed to load overdue transactions: {}", e);
                self.notices.report(&e, "Failed to load overdue transactions");
                self.overdue.clear();
            }
        }

        match popular {
            Ok(books) => self.popular = books,
            Err(e) => {
                tracing::error!("Failed to load popular books: {}", e);
                self.notices.report(&e, "Failed to load popular books");
                self.popular.clear();
            }
        }

        self.loading = false;
    }
}
