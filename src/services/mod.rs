//! Service layer: thin wrappers translating domain calls into REST requests

pub mod auth;
pub mod books;
pub mod categories;
pub mod librarians;
pub mod query;
pub mod reports;
pub mod students;
pub mod transactions;

use std::sync::Arc;

use crate::api::ApiClient;

pub use query::{ListFilter, ListQuery};

/// Container for all services, sharing one API client
#[derive(Clone)]
pub struct Services {
    pub api: Arc<ApiClient>,
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub categories: categories::CategoriesService,
    pub students: students::StudentsService,
    pub librarians: librarians::LibrariansService,
    pub transactions: transactions::TransactionsService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services on top of the given client
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            auth: auth::AuthService::new(api.clone()),
            books: books::BooksService::new(api.clone()),
            categories: categories::CategoriesService::new(api.clone()),
            students: students::StudentsService::new(api.clone()),
            librarians: librarians::LibrariansService::new(api.clone()),
            transactions: transactions::TransactionsService::new(api.clone()),
            reports: reports::ReportsService::new(api.clone()),
            api,
        }
    }
}
