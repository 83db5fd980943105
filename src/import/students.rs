//! Student import staging
//!
//! Columns: `student_number, name, class, gender, phone, email, address`.
//! There is no client-side validity gate: every staged row is sent and the server decides.

use super::{is_header_alias, non_empty, read_records, RowError};
use crate::{
    error::{AppError, AppResult, FieldErrors},
    models::{book::ImportSummary, student::StudentInput},
    services::students::StudentsService,
    widgets::Notices,
};

const HEADER_ALIASES: &[&str] = &["nis", "student number", "student_number", "name", "nama"];
const COLUMNS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    StudentNumber,
    Name,
    Class,
    Gender,
    Phone,
    Email,
    Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    pub line: u64,
    pub input: StudentInput,
}

impl StudentDraft {
    pub fn from_fields(line: u64, fields: &[String]) -> Result<Self, String> {
        if fields.len() > COLUMNS {
            return Err(format!("Expected at most {} columns, found {}", COLUMNS, fields.len()));
        }
        let field = |i: usize| fields.get(i).map(String::as_str).unwrap_or("");

        Ok(Self {
            line,
            input: StudentInput {
                student_number: field(0).to_string(),
                name: field(1).to_string(),
                class_name: non_empty(field(2)),
                gender: non_empty(field(3)),
                phone: non_empty(field(4)),
                email: non_empty(field(5)),
                address: non_empty(field(6)),
            },
        })
    }

    pub fn set_field(&mut self, field: StudentField, value: &str) {
        let input = &mut self.input;
        match field {
            StudentField::StudentNumber => input.student_number = value.trim().to_string(),
            StudentField::Name => input.name = value.trim().to_string(),
            StudentField::Class => input.class_name = non_empty(value),
            StudentField::Gender => input.gender = non_empty(value),
            StudentField::Phone => input.phone = non_empty(value),
            StudentField::Email => input.email = non_empty(value),
            StudentField::Address => input.address = non_empty(value),
        }
    }
}

/// Staging area of the student import screen
#[derive(Debug, Default)]
pub struct StudentImport {
    rows: Vec<StudentDraft>,
    errors: Vec<RowError>,
    processing: bool,
    pub notices: Notices,
}

impl StudentImport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> Self {
        let mut import = Self::new();
        import.load(text);
        import
    }

    /// Parse a whole file, replacing anything staged before
    pub fn load(&mut self, text: &str) {
        let (records, mut errors) = read_records(text);
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let first = record.fields.first().map(String::as_str).unwrap_or("");
            if index == 0 && is_header_alias(first, HEADER_ALIASES) {
                continue;
            }
            match StudentDraft::from_fields(record.line, &record.fields) {
                Ok(draft) => rows.push(draft),
                Err(message) => errors.push(RowError {
                    line: record.line,
                    message,
                }),
            }
        }

        tracing::info!("Staged {} student rows ({} rejected)", rows.len(), errors.len());
        self.rows = rows;
        self.errors = errors;
    }

    pub fn rows(&self) -> &[StudentDraft] {
        &self.rows
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn set_field(&mut self, index: usize, field: StudentField, value: &str) {
        if let Some(row) = self.rows.get_mut(index) {
            row.set_field(field, value);
        }
    }

    pub fn remove_row(&mut self, index: usize) -> Option<StudentDraft> {
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

    /// Send every staged row as one batch. Success clears the staging area.
    pub async fn commit(&mut self, students: &StudentsService) -> AppResult<ImportSummary> {
        if self.rows.is_empty() {
            let err = AppError::Validation(FieldErrors::single("rows", "No rows to import"));
            self.notices.report(&err, "Nothing to import");
            return Err(err);
        }
        if self.processing {
            return Err(AppError::api("An import is already in progress"));
        }

        let batch: Vec<StudentInput> = self.rows.iter().map(|r| r.input.clone()).collect();
        self.processing = true;
        let result = students.import(&batch).await;
        self.processing = false;

        match result {
            Ok(summary) => {
                self.notices
                    .success(format!("Imported {} student(s)", batch.len()));
                self.clear();
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("Student import failed: {}", e);
                self.notices.report(&e, "Failed to import students");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_header() {
        let text = "NIS,Name,Class,Gender,Phone,Email,Address\n\
                    1001,Ana Putri,7A,F,,ana@school.test,\"Jl. Merdeka 1, Bandung\"\n\
                    1002,Budi\n";
        let import = StudentImport::parse(text);
        assert!(import.errors().is_empty());
        assert_eq!(import.rows().len(), 2);

        let ana = &import.rows()[0].input;
        assert_eq!(ana.student_number, "1001");
        assert_eq!(ana.class_name.as_deref(), Some("7A"));
        assert_eq!(ana.phone, None);
        assert_eq!(ana.address.as_deref(), Some("Jl. Merdeka 1, Bandung"));

        let budi = &import.rows()[1].input;
        assert_eq!(budi.name, "Budi");
        assert_eq!(budi.email, None);
    }

    #[test]
    fn test_rows_without_header_all_staged() {
        let import = StudentImport::parse("1001,Ana\n1002,Budi\n,\n1003,");
        assert_eq!(import.rows().len(), 3);
        assert_eq!(import.rows()[2].input.name, "");
    }

    #[test]
    fn test_header_aliases() {
        assert_eq!(StudentImport::parse("Nama,Kelas\n1001,Ana").rows().len(), 1);
        assert_eq!(StudentImport::parse("Student Number,Name\n1001,Ana").rows().len(), 1);

        let import = StudentImport::parse("No,Name\n1001,Ana");
        assert_eq!(import.rows().len(), 2);
        assert_eq!(import.rows()[0].input.student_number, "No");
    }

    #[test]
    fn test_too_many_columns() {
        let import = StudentImport::parse("1001,Ana,7A,F,1,a@b.c,addr,extra");
        assert!(import.rows().is_empty());
        assert_eq!(import.errors()[0].line, 1);
    }

    #[test]
    fn test_edit_row() {
        let mut import = StudentImport::parse("1001,Ana");
        import.set_field(0, StudentField::Email, " ana@school.test ");
        import.set_field(0, StudentField::Class, "  ");
        assert_eq!(import.rows()[0].input.email.as_deref(), Some("ana@school.test"));
        assert_eq!(import.rows()[0].input.class_name, None);
    }
}
