//! List query shared by every paginated endpoint

use crate::api::PageParams;

/// Entity-specific filters appended to a list request
pub trait ListFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>);
}

impl ListFilter for () {
    fn append_params(&self, _params: &mut Vec<(String, String)>) {}
}

/// Page, page size, committed search term and filters of one list request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F = ()> {
    pub page: u32,
    pub per_page: u32,
    pub search: String,
    pub filter: F,
}

impl<F: Default> ListQuery<F> {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            search: String::new(),
            filter: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.filter = filter;
        self
    }
}

impl<F: ListFilter> ListQuery<F> {
    /// Render as query parameters using the endpoint's parameter names
    pub fn params(&self, names: PageParams) -> Vec<(String, String)> {
        let mut params = names.build(self.page.max(1), self.per_page, &self.search);
        self.filter.append_params(&mut params);
        params
    }
}

/// Push `key=value` when the value is present
pub(crate) fn push_opt<T: ToString>(params: &mut Vec<(String, String)>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        params.push((key.to_string(), value.to_string()));
    }
}
