//! Book import staging
//!
//! Columns: `title, author, publisher, year, isbn, good_qty, fair_qty, poor_qty`.
//! A staged row is importable only once it has a category and at least one copy.

use super::{is_header_alias, normalize_isbn, parse_optional, read_records, RowError};
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{
        book::{BookImportRow, ImportSummary},
        Category, ItemCondition,
    },
    services::books::BooksService,
    widgets::{Notices, SelectOption},
};

const HEADER_ALIASES: &[&str] = &["title", "judul", "book title"];
const COLUMNS: usize = 8;
/// Upper bound on copies per condition in one staged row
pub const MAX_QUANTITY: u32 = 10_000;

/// Editable text columns of a staged book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Title,
    Author,
    Publisher,
    Isbn,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookDraft {
    pub line: u64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: Option<i32>,
    pub isbn: String,
    pub good_qty: u32,
    pub fair_qty: u32,
    pub poor_qty: u32,
    pub category: Option<SelectOption<Category>>,
    pub is_valid: bool,
}

impl BookDraft {
    /// Build a draft from positional fields; missing quantity columns count as zero
    pub fn from_fields(line: u64, fields: &[String]) -> Result<Self, String> {
        if fields.len() > COLUMNS {
            return Err(format!("Expected at most {} columns, found {}", COLUMNS, fields.len()));
        }
        let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

        let title = field(0).to_string();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        let year = parse_optional::<i32>(field(3))
            .map_err(|_| format!("Invalid year '{}'", field(3)))?;
        let quantity = |i: usize, name: &str| -> Result<u32, String> {
            let qty = parse_optional::<u32>(field(i))
                .map(Option::unwrap_or_default)
                .map_err(|_| format!("Invalid {} quantity '{}'", name, field(i)))?;
            if qty > MAX_QUANTITY {
                return Err(format!(
                    "{} quantity {} exceeds the limit of {}",
                    name, qty, MAX_QUANTITY
                ));
            }
            Ok(qty)
        };

        let mut draft = Self {
            line,
            title,
            author: field(1).to_string(),
            publisher: field(2).to_string(),
            year,
            isbn: normalize_isbn(field(4)),
            good_qty: quantity(5, "good")?,
            fair_qty: quantity(6, "fair")?,
            poor_qty: quantity(7, "poor")?,
            category: None,
            is_valid: false,
        };
        draft.recompute();
        Ok(draft)
    }

    pub fn total_qty(&self) -> u64 {
        u64::from(self.good_qty) + u64::from(self.fair_qty) + u64::from(self.poor_qty)
    }

    pub fn quantity(&self, condition: ItemCondition) -> u32 {
        match condition {
            ItemCondition::Good => self.good_qty,
            ItemCondition::Fair => self.fair_qty,
            ItemCondition::Poor => self.poor_qty,
        }
    }

    fn recompute(&mut self) {
        let has_category = self
            .category
            .as_ref()
            .is_some_and(|c| !c.value.trim().is_empty());
        self.is_valid = has_category && self.total_qty() > 0;
    }

    pub fn set_category(&mut self, category: Option<SelectOption<Category>>) {
        self.category = category;
        self.recompute();
    }

    /// Set the copies of one condition, clamped to [`MAX_QUANTITY`]
    pub fn set_quantity(&mut self, condition: ItemCondition, qty: u32) {
        let qty = qty.min(MAX_QUANTITY);
        match condition {
            ItemCondition::Good => self.good_qty = qty,
            ItemCondition::Fair => self.fair_qty = qty,
            ItemCondition::Poor => self.poor_qty = qty,
        }
        self.recompute();
    }

    pub fn set_field(&mut self, field: BookField, value: &str) {
        let value = value.trim();
        match field {
            BookField::Title => self.title = value.to_string(),
            BookField::Author => self.author = value.to_string(),
            BookField::Publisher => self.publisher = value.to_string(),
            BookField::Isbn => self.isbn = normalize_isbn(value),
        }
        self.recompute();
    }

    pub fn set_year(&mut self, year: Option<i32>) {
        self.year = year;
        self.recompute();
    }

    /// Request row for a valid draft
    pub fn to_import_row(&self) -> Option<BookImportRow> {
        if !self.is_valid {
            return None;
        }
        let category = self.category.as_ref()?;
        Some(BookImportRow {
            title: self.title.clone(),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            publication_year: self.year,
            isbn: self.isbn.clone(),
            category_id: category.data.id,
            good_qty: self.good_qty,
            fair_qty: self.fair_qty,
            poor_qty: self.poor_qty,
        })
    }
}

/// A header row names the first column and has no numeric quantities
fn is_header(fields: &[String]) -> bool {
    let first = fields.first().map(String::as_str).unwrap_or("");
    if !is_header_alias(first, HEADER_ALIASES) {
        return false;
    }
    let quantities = &fields[fields.len().min(5)..];
    quantities.is_empty() || quantities.iter().any(|q| q.trim().parse::<u32>().is_err())
}

/// Staging area of the book import screen
#[derive(Debug, Default)]
pub struct BookImport {
    rows: Vec<BookDraft>,
    errors: Vec<RowError>,
    processing: bool,
    pub notices: Notices,
}

impl BookImport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole file, replacing anything staged before
    pub fn parse(text: &str) -> Self {
        let mut import = Self::new();
        import.load(text);
        import
    }

    pub fn load(&mut self, text: &str) {
        let (records, mut errors) = read_records(text);
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if index == 0 && is_header(&record.fields) {
                continue;
            }
            match BookDraft::from_fields(record.line, &record.fields) {
                Ok(draft) => rows.push(draft),
                Err(message) => errors.push(RowError {
                    line: record.line,
                    message,
                }),
            }
        }

        tracing::info!("Staged {} book rows ({} rejected)", rows.len(), errors.len());
        self.rows = rows;
        self.errors = errors;
    }

    pub fn rows(&self) -> &[BookDraft] {
        &self.rows
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn valid_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_valid).count()
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut BookDraft> {
        self.rows.get_mut(index)
    }

    pub fn set_category(&mut self, index: usize, category: Option<SelectOption<Category>>) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_category(category);
        }
    }

    pub fn set_quantity(&mut self, index: usize, condition: ItemCondition, qty: u32) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_quantity(condition, qty);
        }
    }

    pub fn set_field(&mut self, index: usize, field: BookField, value: &str) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_field(field, value);
        }
    }

    /// Stamp one category on every staged row; each row re-evaluates its own validity
    pub fn apply_category_to_all(&mut self, category: &SelectOption<Category>) {
        for row in &mut self.rows {
            row.set_category(Some(category.clone()));
        }
    }

    pub fn remove_row(&mut self, index: usize) -> Option<BookDraft> {
        if index < self.rows.len() {
            Some(self.rows.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.errors.clear();
    }

    /// Send the valid rows as one batch. Success clears the staging area.
    pub async fn commit(&mut self, books: &BooksService) -> AppResult<ImportSummary> {
        let batch: Vec<BookImportRow> = self.rows.iter().filter_map(BookDraft::to_import_row).collect();
        if batch.is_empty() {
            let err = AppError::Validation(FieldErrors::single(
                "rows",
                "No valid rows to import: every row needs a category and at least one copy",
            ));
            self.notices.report(&err, "Nothing to import");
            return Err(err);
        }
        if self.processing {
            return Err(AppError::api("An import is already in progress"));
        }

        self.processing = true;
        let result = books.import(&batch).await;
        self.processing = false;

        match result {
            Ok(summary) => {
                tracing::info!("Imported {} book rows", batch.len());
                self.notices
                    .success(format!("Imported {} book(s)", batch.len()));
                self.clear();
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("Book import failed: {}", e);
                self.notices.report(&e, "Failed to import books");
                Err(e)
            }
        }
    }
}
