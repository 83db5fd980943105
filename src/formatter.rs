//! Terminal output for command results.

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;

use library_admin::{
    import::{books::BookDraft, students::StudentDraft, RowError},
    models::{
        BookItem, BookMaster, BorrowTransaction, Category, DashboardSummary, Librarian, PageMeta,
        PopularBook, ReturnTransaction, Student,
    },
    widgets::{pagination::range_label, Notice, NoticeLevel},
};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

/// A record that can be shown as one table row.
pub trait TableRow {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

impl TableRow for BookMaster {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Author", "Publisher", "Year", "Category", "Available"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            opt(&self.author),
            opt(&self.publisher),
            self.publication_year.map(|y| y.to_string()).unwrap_or_default(),
            self.category.as_ref().map(|c| c.name.clone()).unwrap_or_default(),
            match (self.available_items, self.total_items) {
                (Some(available), Some(total)) => format!("{}/{}", available, total),
                _ => String::new(),
            },
        ]
    }
}

impl TableRow for BookItem {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Code", "Title", "Condition", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.book.as_ref().map(|b| b.title.clone()).unwrap_or_default(),
            self.condition.to_string(),
            self.status.to_string(),
        ]
    }
}

impl TableRow for Student {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Number", "Name", "Class", "Email", "Active"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student_number.clone(),
            self.name.clone(),
            opt(&self.class_name),
            opt(&self.email),
            if self.is_active { "yes" } else { "no" }.to_string(),
        ]
    }
}

impl TableRow for Category {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Description", "Books"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt(&self.description),
            self.books_count.map(|c| c.to_string()).unwrap_or_default(),
        ]
    }
}

impl TableRow for Librarian {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Name", "Email", "Phone", "Role"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt(&self.email),
            opt(&self.phone),
            opt(&self.role),
        ]
    }
}

impl TableRow for BorrowTransaction {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Student", "Items", "Borrowed", "Due", "Status"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.student.label(),
            self.items
                .iter()
                .map(|i| i.book_item.code.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            self.borrow_date.to_string(),
            self.due_date.to_string(),
            self.status.to_string(),
        ]
    }
}

impl TableRow for ReturnTransaction {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Borrow", "Returned", "Items"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.borrow_transaction_id.to_string(),
            self.return_date.to_string(),
            self.items.len().to_string(),
        ]
    }
}

impl TableRow for PopularBook {
    fn headers() -> Vec<&'static str> {
        vec!["Title", "Author", "Borrows"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.title.clone(), opt(&self.author), self.borrows.to_string()]
    }
}

fn table(headers: Vec<&'static str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.into_iter().map(Cell::new));
    table
}

/// Render rows in the requested format
pub fn format_rows<T: TableRow + Serialize>(rows: &[T], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(rows).unwrap_or_else(|e| e.to_string()),
        OutputFormat::Table => {
            if rows.is_empty() {
                return "No data".to_string();
            }
            let mut table = table(T::headers());
            for row in rows {
                table.add_row(row.cells());
            }
            table.to_string()
        }
    }
}

/// Rows of one page followed by the "Showing x to y of z" footer
pub fn format_page<T: TableRow + Serialize>(rows: &[T], meta: &PageMeta, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({ "data": rows, "meta": meta }).to_string(),
        OutputFormat::Table => format!(
            "{}\n{} (page {} of {})",
            format_rows(rows, format),
            range_label(meta, rows.len()),
            meta.page,
            meta.total_pages().max(1),
        ),
    }
}

pub fn format_summary(summary: &DashboardSummary, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(summary).unwrap_or_else(|e| e.to_string());
    }
    let mut table = table(vec!["Metric", "Value"]);
    for (label, value) in [
        ("Titles", summary.total_books),
        ("Copies", summary.total_items),
        ("Available copies", summary.available_items),
        ("Borrowed copies", summary.borrowed_items),
        ("Students", summary.total_students),
        ("Active borrows", summary.active_borrows),
        ("Overdue borrows", summary.overdue_borrows),
    ] {
        table.add_row(vec![label.to_string(), value.to_string()]);
    }
    table.to_string()
}

/// Staged book rows, with the import validity of each
pub fn format_book_drafts(rows: &[BookDraft]) -> String {
    let mut table = table(vec!["Line", "Title", "Author", "Year", "ISBN", "Good", "Fair", "Poor", "Category", "Valid"]);
    for row in rows {
        table.add_row(vec![
            row.line.to_string(),
            row.title.clone(),
            row.author.clone(),
            row.year.map(|y| y.to_string()).unwrap_or_default(),
            row.isbn.clone(),
            row.good_qty.to_string(),
            row.fair_qty.to_string(),
            row.poor_qty.to_string(),
            row.category.as_ref().map(|c| c.label.clone()).unwrap_or_default(),
            if row.is_valid { "yes" } else { "no" }.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_student_drafts(rows: &[StudentDraft]) -> String {
    let mut table = table(vec!["Line", "Number", "Name", "Class", "Gender", "Email"]);
    for row in rows {
        let input = &row.input;
        table.add_row(vec![
            row.line.to_string(),
            input.student_number.clone(),
            input.name.clone(),
            opt(&input.class_name),
            opt(&input.gender),
            opt(&input.email),
        ]);
    }
    table.to_string()
}

/// Print parse errors of an import file to stderr
pub fn print_row_errors(errors: &[RowError]) {
    for error in errors {
        eprintln!("skipped {}", error);
    }
}

/// Print notices to stderr
pub fn print_notices(notices: impl IntoIterator<Item = Notice>) {
    for notice in notices {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{}] {}", tag, notice.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category {
            id: 3,
            name: "Fiction".to_string(),
            description: None,
            books_count: Some(12),
        }
    }

    #[test]
    fn test_table_contains_cells() {
        let output = format_rows(&[category()], OutputFormat::Table);
        assert!(output.contains("Fiction"));
        assert!(output.contains("12"));
    }

    #[test]
    fn test_empty_table() {
        let rows: Vec<Category> = Vec::new();
        assert_eq!(format_rows(&rows, OutputFormat::Table), "No data");
    }

    #[test]
    fn test_json_output() {
        let output = format_rows(&[category()], OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["name"], "Fiction");
    }
}
