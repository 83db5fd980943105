//! Student service

use std::sync::Arc;

use serde::Serialize;
use validator::Validate;

use super::query::{push_opt, ListFilter, ListQuery};
use crate::{
    api::{ApiClient, PageParams},
    error::AppResult,
    models::{
        book::ImportSummary,
        student::{StudentImportRow, StudentInput},
        Id, Paginated, Student,
    },
};

const PATH: &str = "students";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilter {
    pub class_name: Option<String>,
}

impl ListFilter for StudentFilter {
    fn append_params(&self, params: &mut Vec<(String, String)>) {
        push_opt(
            params,
            "class",
            self.class_name.as_deref().map(str::trim).filter(|c| !c.is_empty()),
        );
    }
}

#[derive(Serialize)]
struct StudentImportBatch<'a> {
    students: &'a [StudentImportRow],
}

#[derive(Clone)]
pub struct StudentsService {
    api: Arc<ApiClient>,
}

impl StudentsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ListQuery<StudentFilter>) -> AppResult<Paginated<Student>> {
        self.api
            .get_page(PATH, &query.params(PageParams::PER_PAGE_SEARCH))
            .await
    }

    pub async fn get(&self, id: Id) -> AppResult<Student> {
        self.api.get(&format!("{}/{}", PATH, id), &[]).await
    }

    pub async fn create(&self, input: &StudentInput) -> AppResult<Student> {
        input.validate()?;
        self.api.post(PATH, input).await
    }

    pub async fn update(&self, id: Id, input: &StudentInput) -> AppResult<Student> {
        input.validate()?;
        self.api.put(&format!("{}/{}", PATH, id), input).await
    }

    pub async fn delete(&self, id: Id) -> AppResult<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }

    /// Create students in one batch
    pub async fn import(&self, rows: &[StudentImportRow]) -> AppResult<ImportSummary> {
        tracing::info!("Importing {} student rows", rows.len());
        self.api
            .post(&format!("{}/import", PATH), &StudentImportBatch { students: rows })
            .await
    }
}
