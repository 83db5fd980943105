//! Borrow form: one student, a deduplicated list of available copies, and a due date

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::{
    config::UiConfig,
    error::{AppResult, FieldErrors},
    models::{transaction::BorrowRequest, BookItem, BorrowTransaction, Id, Student},
    pages::{books::AvailableItemOptions, students::StudentOptions},
    services::transactions::TransactionsService,
    widgets::{AsyncSelect, Notices, OptionSource, SelectOption},
};

pub const SUBMIT_FALLBACK: &str = "Failed to create borrow transaction.";

pub struct BorrowForm<SS = StudentOptions, IS = AvailableItemOptions>
where
    SS: OptionSource<Item = Student>,
    IS: OptionSource<Item = BookItem>,
{
    pub student_picker: AsyncSelect<SS>,
    pub item_picker: AsyncSelect<IS>,
    student: Option<SelectOption<Student>>,
    items: Vec<BookItem>,
    borrow_date: NaiveDate,
    duration_days: u32,
    notes: Option<String>,
    submitting: bool,
    error: Option<String>,
    pub notices: Notices,
}

impl<SS, IS> BorrowForm<SS, IS>
where
    SS: OptionSource<Item = Student>,
    IS: OptionSource<Item = BookItem>,
{
    pub fn new(students: Arc<SS>, items: Arc<IS>, ui: &UiConfig, today: NaiveDate) -> Self {
        Self {
            student_picker: AsyncSelect::new(students, ui.select_debounce())
                .with_scroll_threshold(ui.scroll_threshold_px),
            item_picker: AsyncSelect::new(items, ui.select_debounce())
                .with_scroll_threshold(ui.scroll_threshold_px),
            student: None,
            items: Vec::new(),
            borrow_date: today,
            duration_days: ui.default_borrow_days,
            notes: None,
            submitting: false,
            error: None,
            notices: Notices::new(),
        }
    }

    pub fn student(&self) -> Option<&SelectOption<Student>> {
        self.student.as_ref()
    }

    pub fn items(&self) -> &[BookItem] {
        &self.items
    }

    pub fn borrow_date(&self) -> NaiveDate {
        self.borrow_date
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Message from the last failed submission
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pick the student at `index` of the student picker
    pub fn pick_student(&mut self, index: usize) -> bool {
        match self.student_picker.select(index) {
            Some(option) => {
                self.student = Some(option);
                true
            }
            None => false,
        }
    }

    /// Set the borrower directly, bypassing the picker
    pub fn set_student(&mut self, student: Student) {
        self.student = Some(SelectOption::new(student.id.to_string(), student.label(), student));
    }

    pub fn clear_student(&mut self) {
        self.student_picker.clear();
        self.student = None;
    }

    /// Add the copy at `index` of the item picker; the picker is cleared for the next pick
    pub fn pick_item(&mut self, index: usize) -> bool {
        let Some(option) = self.item_picker.select(index) else {
            return false;
        };
        self.item_picker.clear();
        self.add_item(option.data)
    }

    /// Add a copy unless it is already on the list. It is hidden from the picker from now on.
    pub fn add_item(&mut self, item: BookItem) -> bool {
        if self.items.iter().any(|i| i.id == item.id) {
            return false;
        }
        self.item_picker.state_mut().exclude(item.id.to_string());
        self.items.push(item);
        true
    }

    pub fn remove_item(&mut self, id: Id) -> Option<BookItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        self.item_picker.state_mut().include(&id.to_string());
        Some(self.items.remove(index))
    }

    pub fn set_borrow_date(&mut self, date: NaiveDate) {
        self.borrow_date = date;
    }

    pub fn set_duration_days(&mut self, days: u32) {
        self.duration_days = days;
    }

    pub fn set_notes(&mut self, notes: &str) {
        let notes = notes.trim();
        self.notes = (!notes.is_empty()).then(|| notes.to_string());
    }

    /// Borrow date plus the loan duration
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.borrow_date
            .checked_add_days(Days::new(self.duration_days as u64))
    }

    pub fn validate(&self) -> Result<BorrowRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.student.is_none() {
            errors.add("student_id", "Please select a student");
        }
        if self.items.is_empty() {
            errors.add("book_item_ids", "Please add at least one book item");
        }
        if self.duration_days == 0 {
            errors.add("duration", "Loan duration must be at least one day");
        }
        let due_date = self.due_date();
        if due_date.is_none() {
            errors.add("due_date", "Due date is out of range");
        }

        match (&self.student, due_date) {
            (Some(student), Some(due_date)) if errors.is_empty() => Ok(BorrowRequest {
                student_id: student.data.id,
                book_item_ids: self.items.iter().map(|i| i.id).collect(),
                borrow_date: self.borrow_date,
                due_date,
                notes: self.notes.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// Submit as a single request. On failure the form keeps its content and shows the
    /// server message, or a generic one.
    pub async fn submit(&mut self, transactions: &TransactionsService) -> AppResult<BorrowTransaction> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(errors) => {
                let err = crate::error::AppError::Validation(errors);
                self.error = Some(err.user_message(SUBMIT_FALLBACK));
                return Err(err);
            }
        };

        self.submitting = true;
        self.error = None;
        let result = transactions.borrow(&request).await;
        self.submitting = false;

        match result {
            Ok(transaction) => {
                self.notices.success("Borrow transaction created");
                self.reset();
                Ok(transaction)
            }
            Err(e) => {
                tracing::error!("Failed to create borrow transaction: {}", e);
                self.error = Some(e.user_message(SUBMIT_FALLBACK));
                Err(e)
            }
        }
    }

    /// Clear selections after a successful submission, keeping date and duration
    pub fn reset(&mut self) {
        self.student = None;
        self.items.clear();
        self.notes = None;
        self.error = None;
        self.student_picker.reset();
        self.item_picker.reset();
    }
}
