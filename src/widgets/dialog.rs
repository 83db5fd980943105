//! Confirmation dialog (delete prompts)

/// Holds the target of a destructive action until the operator confirms or cancels
#[derive(Debug, Clone)]
pub struct ConfirmDialog<T> {
    target: Option<T>,
    message: String,
    processing: bool,
}

impl<T> Default for ConfirmDialog<T> {
    fn default() -> Self {
        Self {
            target: None,
            message: String::new(),
            processing: false,
        }
    }
}

impl<T: Clone> ConfirmDialog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, target: T, message: impl Into<String>) {
        if self.processing {
            return;
        }
        self.target = Some(target);
        self.message = message.into();
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn cancel(&mut self) {
        if !self.processing {
            self.target = None;
            self.message.clear();
        }
    }

    /// Start processing the confirmed action. Returns `None` if nothing is pending
    /// or a confirmation is already being processed.
    pub fn confirm(&mut self) -> Option<T> {
        if self.processing {
            return None;
        }
        let target = self.target.clone()?;
        self.processing = true;
        Some(target)
    }

    /// Close the dialog once the confirmed action has finished, successfully or not
    pub fn finish(&mut self) {
        self.processing = false;
        self.target = None;
        self.message.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_once() {
        let mut dialog = ConfirmDialog::new();
        dialog.open(42_i64, "Delete this book?");
        assert!(dialog.is_open());

        assert_eq!(dialog.confirm(), Some(42));
        assert_eq!(dialog.confirm(), None);

        dialog.cancel();
        assert!(dialog.is_open());

        dialog.finish();
        assert!(!dialog.is_open());
        assert_eq!(dialog.confirm(), None);
    }
}
