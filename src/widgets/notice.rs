//! Transient user notices (rendered as toasts by a host)

use std::collections::VecDeque;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// FIFO queue drained by whatever renders notifications
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.queue.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message);
    }

    /// Push one error notice per user message of `err` (one per field for validation errors)
    pub fn report(&mut self, err: &AppError, fallback: &str) {
        for message in err.user_messages(fallback) {
            self.error(message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldErrors;

    #[test]
    fn test_report_validation_one_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("books.0.isbn", "The isbn has already been taken.");
        errors.add("books.2.title", "The title field is required.");

        let mut notices = Notices::new();
        notices.report(&AppError::Validation(errors), "Import failed");

        let drained = notices.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained.iter().all(|n| n.level == NoticeLevel::Error));
        assert!(notices.is_empty());
    }
}
