//! Student pages and the student picker

use std::sync::Arc;

use async_trait::async_trait;

use super::list::{ListPage, ListSource, RowDelete};
use crate::{
    config::UiConfig,
    error::AppResult,
    models::{Id, Paginated, Student},
    services::{
        students::{StudentFilter, StudentsService},
        ListQuery, Services,
    },
    widgets::{LoadRequest, OptionSource, OptionsPage, SelectOption},
};

pub struct StudentSource {
    students: StudentsService,
}

#[async_trait]
impl ListSource for StudentSource {
    type Row = Student;
    type Filter = StudentFilter;

    fn name(&self) -> &'static str {
        "students"
    }

    async fn fetch_page(&self, query: &ListQuery<StudentFilter>) -> AppResult<Paginated<Student>> {
        self.students.list(query).await
    }
}

#[async_trait]
impl RowDelete for StudentSource {
    async fn delete_row(&self, id: Id) -> AppResult<()> {
        self.students.delete(id).await
    }
}

pub type StudentListPage = ListPage<StudentSource>;

pub fn student_list_page(services: &Services, ui: &UiConfig) -> StudentListPage {
    let source = StudentSource {
        students: services.students.clone(),
    };
    ListPage::new(Arc::new(source), ui.default_per_page, ui.search_debounce())
}

/// Borrowers for the borrow form picker; inactive students are not offered
pub struct StudentOptions {
    students: StudentsService,
    per_page: u32,
}

impl StudentOptions {
    pub fn new(services: &Services, ui: &UiConfig) -> Self {
        Self {
            students: services.students.clone(),
            per_page: ui.select_page_size,
        }
    }
}

#[async_trait]
impl OptionSource for StudentOptions {
    type Item = Student;

    async fn load_options(&self, request: LoadRequest) -> AppResult<OptionsPage<Student>> {
        let query = ListQuery::<StudentFilter>::new(request.page, self.per_page).with_search(request.keyword);
        let page = self.students.list(&query).await?;
        let mut options = OptionsPage::from_page(page, |student| {
            SelectOption::new(student.id.to_string(), student.label(), student)
        });
        options.options.retain(|o| o.data.is_active);
        Ok(options)
    }
}
