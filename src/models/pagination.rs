//! Response envelope and pagination metadata

use serde::{Deserialize, Serialize};

use crate::error::FieldErrors;

/// Pagination block attached to list responses.
///
/// Endpoints disagree on naming (`page` vs `current_page`, `per_page` vs `limit`),
/// so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(alias = "current_page", default = "default_page")]
    pub page: u32,
    #[serde(alias = "limit", default)]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub last_page: u32,
}

fn default_page() -> u32 {
    1
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 0,
            total: 0,
            last_page: 1,
        }
    }
}

impl PageMeta {
    /// Metadata for an empty result set at the given page size
    pub fn empty(per_page: u32) -> Self {
        Self {
            per_page,
            ..Self::default()
        }
    }

    /// Total pages, never less than one
    pub fn total_pages(&self) -> u32 {
        if self.last_page > 0 {
            return self.last_page;
        }
        if self.per_page == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(self.per_page as u64);
        pages.max(1) as u32
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// One page of rows plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub rows: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    pub fn empty(per_page: u32) -> Self {
        Self {
            rows: Vec::new(),
            meta: PageMeta::empty(per_page),
        }
    }

    pub fn has_more(&self) -> bool {
        self.meta.has_more()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            rows: self.rows.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Generic JSON envelope: `{status, message, data, meta, errors}`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiEnvelope<T> {
    /// Envelopes without a status field are treated as successful
    pub fn is_success(&self) -> bool {
        match self.status.as_deref() {
            None => true,
            Some(status) => status.eq_ignore_ascii_case("success"),
        }
    }
}
