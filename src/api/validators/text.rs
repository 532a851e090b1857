//! Free-text field checks: names, short labels, notes.
//!
//! The markup checks are blunt substring tests that keep obvious HTML out of
//! the admin views. They are not a sanitizer.

use super::{ValidationError, Validator};

pub const MAX_SHORT_TEXT: usize = 255;
pub const MAX_NOTES: usize = 5000;

pub struct FullNameValidator;

impl FullNameValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FullNameValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for FullNameValidator {
    fn clean(&self, input: &str) -> Result<String, ValidationError> {
        const FIELD: &str = "full_name";
        let s = input.trim();

        if s.is_empty() {
            return Err(ValidationError::new(FIELD, "blank", "Full name cannot be empty."));
        }

        if s.chars().all(char::is_numeric) {
            return Err(ValidationError::new(FIELD, "numeric", "Full name cannot be only numbers."));
        }

        if s.chars().count() < 2 {
            return Err(ValidationError::new(
                FIELD,
                "too_short",
                "Full name must be at least 2 characters.",
            ));
        }

        if s.contains('<') || s.contains('>') || s.to_lowercase().contains("script") {
            return Err(ValidationError::new(FIELD, "markup", "Full name contains invalid characters."));
        }

        if s.chars().count() > MAX_SHORT_TEXT {
            return Err(ValidationError::new(
                FIELD,
                "too_long",
                format!("Ensure this field has no more than {} characters.", MAX_SHORT_TEXT),
            ));
        }

        Ok(s.to_string())
    }
}

/// Position and company name: at least 2 characters, no angle brackets.
pub struct ShortTextValidator {
    field: &'static str,
    label: &'static str,
}

impl ShortTextValidator {
    pub fn new(field: &'static str, label: &'static str) -> Self {
        Self { field, label }
    }

    pub fn position() -> Self {
        Self::new("position", "Position")
    }

    pub fn company_name() -> Self {
        Self::new("company_name", "Company name")
    }
}

impl Validator for ShortTextValidator {
    fn clean(&self, input: &str) -> Result<String, ValidationError> {
        let s = input.trim();
        let len = s.chars().count();

        if len < 2 {
            return Err(ValidationError::new(
                self.field,
                "too_short",
                format!("{} must be at least 2 characters.", self.label),
            ));
        }

        if s.contains('<') || s.contains('>') {
            return Err(ValidationError::new(
                self.field,
                "markup",
                format!("{} contains invalid characters.", self.label),
            ));
        }

        if len > MAX_SHORT_TEXT {
            return Err(ValidationError::new(
                self.field,
                "too_long",
                format!("Ensure this field has no more than {} characters.", MAX_SHORT_TEXT),
            ));
        }

        Ok(s.to_string())
    }
}

pub struct NotesValidator;

impl NotesValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NotesValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for NotesValidator {
    fn clean(&self, input: &str) -> Result<String, ValidationError> {
        const FIELD: &str = "notes";

        if input.chars().count() > MAX_NOTES {
            return Err(ValidationError::new(
                FIELD,
                "too_long",
                format!("Notes cannot exceed {} characters.", MAX_NOTES),
            ));
        }

        let lower = input.to_lowercase();
        if lower.contains("<script") || lower.contains("</script") {
            return Err(ValidationError::new(FIELD, "markup", "Notes contain invalid content."));
        }

        Ok(input.trim().to_string())
    }
}
