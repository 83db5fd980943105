//! Remote paginated list controller shared by every list page
//!
//! Holds page, page size, debounced search and filters, and fetches one page at a time.
//! Fetches are split into [`RemoteList::begin_fetch`] and [`RemoteList::finish_fetch`] so a
//! host can run several concurrently; only the latest issued fetch is applied.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep_until, Instant};

use crate::{
    error::AppResult,
    models::{Id, PageMeta, Paginated},
    services::{ListFilter, ListQuery},
    widgets::{ConfirmDialog, Debouncer, Notices, Pagination, RequestTracker, Ticket},
};

/// Fetches one page of rows for a query
#[cfg_attr(test, mockall::automock(type Row = String; type Filter = ();))]
#[async_trait]
pub trait ListSource: Send + Sync {
    type Row: Clone + Send + Sync;
    type Filter: ListFilter + Clone + Default + Send + Sync;

    /// Entity name used in logs and notices ("books", "students")
    fn name(&self) -> &'static str;

    async fn fetch_page(&self, query: &ListQuery<Self::Filter>) -> AppResult<Paginated<Self::Row>>;
}

/// Sources whose rows can be deleted from the list page
#[async_trait]
pub trait RowDelete: Send + Sync {
    async fn delete_row(&self, id: Id) -> AppResult<()>;
}

/// What the table should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableState {
    Loading,
    Empty,
    Rows,
}

pub struct RemoteList<S: ListSource> {
    source: Arc<S>,
    page: u32,
    per_page: u32,
    search_input: String,
    search: String,
    search_debounce: Debouncer<String>,
    filter: S::Filter,
    rows: Vec<S::Row>,
    meta: PageMeta,
    loading: bool,
    loaded: bool,
    tracker: RequestTracker,
    pub notices: Notices,
}

impl<S: ListSource> RemoteList<S> {
    pub fn new(source: Arc<S>, per_page: u32, search_debounce: Duration) -> Self {
        Self {
            source,
            page: 1,
            per_page: per_page.max(1),
            search_input: String::new(),
            search: String::new(),
            search_debounce: Debouncer::new(search_debounce),
            filter: S::Filter::default(),
            rows: Vec::new(),
            meta: PageMeta::empty(per_page),
            loading: false,
            loaded: false,
            tracker: RequestTracker::new(),
            notices: Notices::new(),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Text currently in the search box
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Search term sent with requests
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> &S::Filter {
        &self.filter
    }

    pub fn rows(&self) -> &[S::Row] {
        &self.rows
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn table_state(&self) -> TableState {
        if self.loading && self.rows.is_empty() {
            TableState::Loading
        } else if self.rows.is_empty() {
            TableState::Empty
        } else {
            TableState::Rows
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::from_meta(&self.meta)
    }

    /// The query the next fetch will send
    pub fn query(&self) -> ListQuery<S::Filter> {
        ListQuery {
            page: self.page,
            per_page: self.per_page,
            search: self.search.clone(),
            filter: self.filter.clone(),
        }
    }

    /// Update the search box; the term is committed once typing pauses
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search_input = text.clone();
        self.search_debounce.push(text, now);
    }

    /// Commit a pending search term. Returns true when the list must be refetched.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.search_debounce.poll(now) {
            Some(term) => {
                let term = term.trim().to_string();
                let changed = term != self.search || self.page != 1;
                self.search = term;
                self.page = 1;
                changed
            }
            None => false,
        }
    }

    /// Commit a search term right away, skipping the quiet period
    pub fn submit_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search_debounce.cancel();
        self.search = text.trim().to_string();
        self.search_input = text;
        self.page = 1;
    }

    /// Replace the filters and go back to the first page
    pub fn set_filter(&mut self, filter: S::Filter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Move to a page; returns true when it differs from the current one
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        true
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Mark a fetch as started and return its ticket and query
    pub fn begin_fetch(&mut self) -> (Ticket, ListQuery<S::Filter>) {
        self.loading = true;
        (self.tracker.issue(), self.query())
    }

    /// Apply a fetch result. Stale results are dropped and leave the state untouched.
    pub fn finish_fetch(&mut self, ticket: Ticket, result: AppResult<Paginated<S::Row>>) -> bool {
        if !self.tracker.complete(ticket) {
            tracing::debug!("Discarding stale {} page (generation {})", self.source.name(), ticket.generation());
            return false;
        }

        self.loading = false;
        self.loaded = true;
        match result {
            Ok(page) => {
                self.rows = page.rows;
                self.meta = page.meta;
            }
            Err(e) => {
                tracing::error!("Failed to fetch {}: {}", self.source.name(), e);
                self.notices
                    .report(&e, &format!("Failed to load {}", self.source.name()));
                self.rows.clear();
                // Keep the requested page
                self.meta = PageMeta {
                    page: self.page,
                    last_page: self.page,
                    ..PageMeta::empty(self.per_page)
                };
            }
        }
        true
    }

    /// Fetch the current page
    pub async fn refresh(&mut self) {
        let (ticket, query) = self.begin_fetch();
        let result = self.source.fetch_page(&query).await;
        self.finish_fetch(ticket, result);
    }

    /// Fetch on first use only
    pub async fn ensure_loaded(&mut self) {
        if !self.loaded && !self.loading {
            self.refresh().await;
        }
    }

    /// Wait for a pending search to commit, then refetch if needed
    pub async fn settle_search(&mut self) {
        if let Some(deadline) = self.search_debounce.deadline() {
            sleep_until(deadline).await;
            if self.poll_search(Instant::now()) {
                self.refresh().await;
            }
        }
    }

    pub async fn go_to_page(&mut self, page: u32) {
        let mut target = None;
        self.pagination().go_to(page, |p| target = Some(p));
        if let Some(page) = target {
            self.set_page(page);
            self.refresh().await;
        }
    }

    pub async fn next_page(&mut self) {
        let mut target = None;
        self.pagination().next(|p| target = Some(p));
        if let Some(page) = target {
            self.set_page(page);
            self.refresh().await;
        }
    }

    pub async fn prev_page(&mut self) {
        let mut target = None;
        self.pagination().prev(|p| target = Some(p));
        if let Some(page) = target {
            self.set_page(page);
            self.refresh().await;
        }
    }

    /// Leaving the page: results of fetches still in flight are ignored
    pub fn unmount(&mut self) {
        self.tracker.invalidate();
        self.search_debounce.cancel();
        self.loading = false;
    }
}

/// A list page: remote list plus delete confirmation
pub struct ListPage<S: ListSource> {
    pub list: RemoteList<S>,
    pub delete_dialog: ConfirmDialog<Id>,
}

impl<S: ListSource> ListPage<S> {
    pub fn new(source: Arc<S>, per_page: u32, search_debounce: Duration) -> Self {
        Self {
            list: RemoteList::new(source, per_page, search_debounce),
            delete_dialog: ConfirmDialog::new(),
        }
    }

    pub fn request_delete(&mut self, id: Id, label: &str) {
        self.delete_dialog
            .open(id, format!("Are you sure you want to delete {}?", label));
    }
}

impl<S: ListSource + RowDelete> ListPage<S> {
    /// Run the confirmed deletion, then reload the current page
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.delete_dialog.confirm() else {
            return false;
        };

        let source = self.list.source().clone();
        let deleted = match source.delete_row(id).await {
            Ok(()) => {
                tracing::info!("Deleted {} {}", source.name(), id);
                self.list.notices.success("Deleted successfully");
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete {} {}: {}", source.name(), id, e);
                self.list
                    .notices
                    .report(&e, &format!("Failed to delete from {}", source.name()));
                false
            }
        };
        self.delete_dialog.finish();

        if deleted {
            // Deleting the last row of a page steps back one page
            if self.list.rows().len() == 1 && self.list.page() > 1 {
                let previous = self.list.page() - 1;
                self.list.set_page(previous);
            }
            self.list.refresh().await;
        }
        deleted
    }
}
