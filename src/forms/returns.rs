//! Return form: pick which outstanding copies of a borrow transaction come back, and in what state

use chrono::NaiveDate;

use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        transaction::{ReturnRequest, ReturnedItem},
        BorrowTransaction, Id, ItemCondition, ItemStatus, ReturnTransaction,
    },
    services::transactions::TransactionsService,
    widgets::Notices,
};

pub const SUBMIT_FALLBACK: &str = "Failed to process return.";

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnLine {
    pub book_item_id: Id,
    pub code: String,
    pub title: Option<String>,
    pub selected: bool,
    pub condition: ItemCondition,
    /// Explicit status override, e.g. lost; the server derives it otherwise
    pub status: Option<ItemStatus>,
    pub notes: Option<String>,
}

impl ReturnLine {
    fn to_returned_item(&self) -> ReturnedItem {
        ReturnedItem {
            book_item_id: self.book_item_id,
            condition: self.condition,
            status: self.status,
            notes: self.notes.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ReturnForm {
    borrow_transaction_id: Id,
    lines: Vec<ReturnLine>,
    return_date: NaiveDate,
    notes: Option<String>,
    submitting: bool,
    error: Option<String>,
    pub notices: Notices,
}

impl ReturnForm {
    /// One line per outstanding copy, all selected, keeping each copy's current condition
    pub fn from_transaction(transaction: &BorrowTransaction, today: NaiveDate) -> Self {
        let lines = transaction
            .outstanding_items()
            .map(|item| ReturnLine {
                book_item_id: item.id,
                code: item.code.clone(),
                title: item.book.as_ref().map(|b| b.title.clone()),
                selected: true,
                condition: item.condition,
                status: None,
                notes: None,
            })
            .collect();

        Self {
            borrow_transaction_id: transaction.id,
            lines,
            return_date: today,
            notes: None,
            submitting: false,
            error: None,
            notices: Notices::new(),
        }
    }

    pub async fn load(transactions: &TransactionsService, id: Id, today: NaiveDate) -> AppResult<Self> {
        let transaction = transactions.get_borrow(id).await?;
        Ok(Self::from_transaction(&transaction, today))
    }

    pub fn borrow_transaction_id(&self) -> Id {
        self.borrow_transaction_id
    }

    pub fn lines(&self) -> &[ReturnLine] {
        &self.lines
    }

    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_count(&self) -> usize {
        self.lines.iter().filter(|l| l.selected).count()
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(line) = self.lines.get_mut(index) {
            line.selected = !line.selected;
        }
    }

    pub fn select_all(&mut self, selected: bool) {
        for line in &mut self.lines {
            line.selected = selected;
        }
    }

    pub fn set_condition(&mut self, index: usize, condition: ItemCondition) {
        if let Some(line) = self.lines.get_mut(index) {
            line.condition = condition;
        }
    }

    pub fn set_status(&mut self, index: usize, status: Option<ItemStatus>) {
        if let Some(line) = self.lines.get_mut(index) {
            line.status = status;
        }
    }

    pub fn set_line_notes(&mut self, index: usize, notes: &str) {
        if let Some(line) = self.lines.get_mut(index) {
            let notes = notes.trim();
            line.notes = (!notes.is_empty()).then(|| notes.to_string());
        }
    }

    pub fn set_return_date(&mut self, date: NaiveDate) {
        self.return_date = date;
    }

    pub fn set_notes(&mut self, notes: &str) {
        let notes = notes.trim();
        self.notes = (!notes.is_empty()).then(|| notes.to_string());
    }

    pub fn validate(&self) -> Result<ReturnRequest, FieldErrors> {
        let items: Vec<ReturnedItem> = self
            .lines
            .iter()
            .filter(|l| l.selected)
            .map(ReturnLine::to_returned_item)
            .collect();
        if items.is_empty() {
            return Err(FieldErrors::single("items", "Please select at least one item to return"));
        }
        Ok(ReturnRequest {
            borrow_transaction_id: self.borrow_transaction_id,
            return_date: self.return_date,
            items,
            notes: self.notes.clone(),
        })
    }

    /// Submit the selected lines. Returned lines leave the form on success.
    pub async fn submit(&mut self, transactions: &TransactionsService) -> AppResult<ReturnTransaction> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(errors) => {
                let err = AppError::Validation(errors);
                self.error = Some(err.user_message(SUBMIT_FALLBACK));
                return Err(err);
            }
        };

        self.submitting = true;
        self.error = None;
        let result = transactions.return_items(&request).await;
        self.submitting = false;

        match result {
            Ok(transaction) => {
                self.lines.retain(|l| !l.selected);
                self.notices
                    .success(format!("Returned {} item(s)", request.items.len()));
                Ok(transaction)
            }
            Err(e) => {
                tracing::error!(
                    "Failed to return items of borrow transaction {}: {}",
                    self.borrow_transaction_id,
                    e
                );
                self.error = Some(e.user_message(SUBMIT_FALLBACK));
                Err(e)
            }
        }
    }
}
