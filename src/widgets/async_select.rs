//! Searchable, paginated single-select combobox
//!
//! [`SelectState`] is the pure state machine: every transition that needs data returns a
//! [`Fetch`] describing the request, and the result is fed back through
//! [`SelectState::apply`]. Each fetch carries a [`Ticket`]; a result whose ticket is no longer
//! the latest is dropped, so a slow response for an old keyword can never overwrite a newer
//! list. [`AsyncSelect`] drives the state machine against an [`OptionSource`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep_until, Instant};

use super::{debounce::Debouncer, request::RequestTracker, request::Ticket};
use crate::{error::AppResult, models::Paginated};

/// Default distance from the bottom of the list that triggers the next page
pub const DEFAULT_SCROLL_THRESHOLD: u32 = 20;

/// Arguments of one option load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub page: u32,
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption<T> {
    pub value: String,
    pub label: String,
    pub data: T,
}

impl<T> SelectOption<T> {
    pub fn new(value: impl Into<String>, label: impl Into<String>, data: T) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionsPage<T> {
    pub options: Vec<SelectOption<T>>,
    pub has_more: bool,
}

impl<T> OptionsPage<T> {
    pub fn empty() -> Self {
        Self {
            options: Vec::new(),
            has_more: false,
        }
    }

    /// Convert one page of records, deriving `has_more` from its metadata
    pub fn from_page<R>(page: Paginated<R>, to_option: impl FnMut(R) -> SelectOption<T>) -> Self {
        let has_more = page.has_more();
        Self {
            options: page.rows.into_iter().map(to_option).collect(),
            has_more,
        }
    }
}

/// Paged, keyword-filterable source of options. The widget knows nothing else about it.
#[async_trait]
pub trait OptionSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    async fn load_options(&self, request: LoadRequest) -> AppResult<OptionsPage<Self::Item>>;
}

/// Whether a load replaces the option list or extends it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Replace,
    Append,
}

/// A load the host must perform, then hand back to [`SelectState::apply`]
#[derive(Debug, Clone, PartialEq)]
pub struct Fetch {
    pub ticket: Ticket,
    pub request: LoadRequest,
    pub mode: LoadMode,
}

#[derive(Debug, Clone)]
pub struct SelectState<T> {
    open: bool,
    loading: bool,
    loaded: bool,
    keyword: String,
    /// Keyword of the loaded options; lags `keyword` until the debounce commits
    committed: String,
    page: u32,
    has_more: bool,
    options: Vec<SelectOption<T>>,
    selected: Option<SelectOption<T>>,
    excluded: HashSet<String>,
    search: Debouncer<String>,
    tracker: RequestTracker,
    scroll_threshold: u32,
}

impl<T: Clone> SelectState<T> {
    pub fn new(debounce: Duration) -> Self {
        Self {
            open: false,
            loading: false,
            loaded: false,
            keyword: String::new(),
            committed: String::new(),
            page: 1,
            has_more: false,
            options: Vec::new(),
            selected: None,
            excluded: HashSet::new(),
            search: Debouncer::new(debounce),
            tracker: RequestTracker::new(),
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }

    pub fn with_scroll_threshold(mut self, threshold: u32) -> Self {
        self.scroll_threshold = threshold;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Keyword the current options were loaded for
    pub fn committed_keyword(&self) -> &str {
        &self.committed
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn options(&self) -> &[SelectOption<T>] {
        &self.options
    }

    pub fn selected(&self) -> Option<&SelectOption<T>> {
        self.selected.as_ref()
    }

    /// Deadline of a pending keyword commit
    pub fn search_deadline(&self) -> Option<Instant> {
        self.search.deadline()
    }

    fn start(&mut self, page: u32, mode: LoadMode) -> Fetch {
        self.loading = true;
        Fetch {
            ticket: self.tracker.issue(),
            request: LoadRequest {
                page,
                keyword: self.committed.clone(),
            },
            mode,
        }
    }

    /// Click on the control: toggles the menu; the first open loads page 1
    pub fn click(&mut self) -> Option<Fetch> {
        if self.open {
            self.open = false;
            return None;
        }
        self.open = true;
        if !self.loaded && !self.loading {
            return Some(self.start(1, LoadMode::Replace));
        }
        None
    }

    /// Click anywhere outside the control. Keyword, options and page stay cached.
    pub fn click_outside(&mut self) {
        self.open = false;
    }

    /// Update the keyword; the reload happens once typing has paused
    pub fn type_keyword(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.open = true;
        self.keyword = text.clone();
        self.search.push(text, now);
    }

    /// Commit the keyword once the quiet period has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<Fetch> {
        self.committed = self.search.poll(now)?;
        Some(self.start(1, LoadMode::Replace))
    }

    /// Scroll position of the option list; near the end, request the next page
    pub fn scroll(&mut self, offset: u32, viewport: u32, content: u32) -> Option<Fetch> {
        let near_end = offset.saturating_add(viewport).saturating_add(self.scroll_threshold) >= content;
        if self.open && near_end && self.has_more && !self.loading {
            let next = self.page + 1;
            return Some(self.start(next, LoadMode::Append));
        }
        None
    }

    /// Apply a load result. Returns false when the result was stale and ignored.
    pub fn apply(&mut self, fetch: &Fetch, result: AppResult<OptionsPage<T>>) -> bool {
        if !self.tracker.complete(fetch.ticket) {
            tracing::debug!(
                "Discarding stale option page {} for keyword '{}'",
                fetch.request.page,
                fetch.request.keyword
            );
            return false;
        }

        self.loading = false;
        self.loaded = true;

        match result {
            Ok(page) => {
                let excluded = &self.excluded;
                let options = page
                    .options
                    .into_iter()
                    .filter(|o| !excluded.contains(&o.value));
                match fetch.mode {
                    LoadMode::Replace => self.options = options.collect(),
                    LoadMode::Append => self.options.extend(options),
                }
                self.page = fetch.request.page;
                self.has_more = page.has_more;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to load options (page {}, keyword '{}'): {}",
                    fetch.request.page,
                    fetch.request.keyword,
                    e
                );
                if fetch.mode == LoadMode::Replace {
                    self.options.clear();
                    self.page = 1;
                }
                self.has_more = false;
            }
        }
        true
    }

    /// Pick an option by position; closes the menu
    pub fn select(&mut self, index: usize) -> Option<SelectOption<T>> {
        let option = self.options.get(index).cloned()?;
        self.selected = Some(option.clone());
        self.open = false;
        Some(option)
    }

    /// Pick an option by value; closes the menu
    pub fn select_value(&mut self, value: &str) -> Option<SelectOption<T>> {
        let index = self.options.iter().position(|o| o.value == value)?;
        self.select(index)
    }

    /// Clear the selection without touching the menu
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Hide an option from this and every later page
    pub fn exclude(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.options.retain(|o| o.value != value);
        self.excluded.insert(value);
    }

    /// Allow a previously excluded option again; it reappears with the next load
    pub fn include(&mut self, value: &str) {
        self.excluded.remove(value);
    }

    /// Forget everything, as a remount would. In-flight loads become stale.
    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.search.cancel();
        self.open = false;
        self.loading = false;
        self.loaded = false;
        self.keyword.clear();
        self.committed.clear();
        self.page = 1;
        self.has_more = false;
        self.options.clear();
        self.selected = None;
    }
}

type ChangeListener<T> = Box<dyn FnMut(Option<&SelectOption<T>>) + Send>;

/// [`SelectState`] bound to an option source and a change listener
pub struct AsyncSelect<S: OptionSource> {
    source: Arc<S>,
    state: SelectState<S::Item>,
    on_change: Option<ChangeListener<S::Item>>,
}

impl<S: OptionSource> AsyncSelect<S> {
    pub fn new(source: Arc<S>, debounce: Duration) -> Self {
        Self {
            source,
            state: SelectState::new(debounce),
            on_change: None,
        }
    }

    pub fn with_scroll_threshold(mut self, threshold: u32) -> Self {
        self.state = self.state.with_scroll_threshold(threshold);
        self
    }

    /// Listener invoked with the picked option, or `None` when cleared
    pub fn on_change(mut self, listener: impl FnMut(Option<&SelectOption<S::Item>>) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> &SelectState<S::Item> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SelectState<S::Item> {
        &mut self.state
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    async fn run(&mut self, fetch: Fetch) {
        let result = self.source.load_options(fetch.request.clone()).await;
        self.state.apply(&fetch, result);
    }

    pub async fn click(&mut self) {
        if let Some(fetch) = self.state.click() {
            self.run(fetch).await;
        }
    }

    pub fn click_outside(&mut self) {
        self.state.click_outside();
    }

    pub fn type_keyword(&mut self, text: impl Into<String>) {
        self.state.type_keyword(text, Instant::now());
    }

    /// Wait for the pending keyword (if any) to commit and load its first page
    pub async fn settle(&mut self) {
        while let Some(deadline) = self.state.search_deadline() {
            sleep_until(deadline).await;
            if let Some(fetch) = self.state.poll(Instant::now()) {
                self.run(fetch).await;
            }
        }
    }

    pub async fn scroll(&mut self, offset: u32, viewport: u32, content: u32) {
        if let Some(fetch) = self.state.scroll(offset, viewport, content) {
            self.run(fetch).await;
        }
    }

    pub fn select(&mut self, index: usize) -> Option<SelectOption<S::Item>> {
        let option = self.state.select(index)?;
        if let Some(listener) = self.on_change.as_mut() {
            listener(Some(&option));
        }
        Some(option)
    }

    pub fn select_value(&mut self, value: &str) -> Option<SelectOption<S::Item>> {
        let index = self.state.options().iter().position(|o| o.value == value)?;
        self.select(index)
    }

    pub fn clear(&mut self) {
        self.state.clear();
        if let Some(listener) = self.on_change.as_mut() {
            listener(None);
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }
}
