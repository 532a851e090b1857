use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub mod client;
pub mod contact;
pub mod lead;
pub mod newsletter;
pub mod text;

pub use client::{ClientValidator, CreateClientRequest};
pub use contact::{EmailValidator, PhoneValidator};
pub use lead::{CreateLeadRequest, LeadValidator, UpdateLeadRequest};
pub use newsletter::{CreateSubscriberRequest, NewsletterValidator};
pub use text::{FullNameValidator, NotesValidator, ShortTextValidator};

/// Key used for errors that concern the whole record rather than one field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new(field, "required", "This field is required.")
    }

    pub fn invalid_choice(field: &str, value: &str, choices: &str) -> Self {
        Self::new(
            field,
            "invalid_choice",
            format!("\"{}\" is not a valid choice. Expected one of: {}.", value, choices),
        )
    }
}

/// Field-level cleaner: checks one input and returns the value to store.
pub trait Validator {
    fn clean(&self, input: &str) -> Result<String, ValidationError>;
}

/// Collects every failure of a submission so they can be reported together.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the value on success, record the error otherwise.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.0.push(e);
                None
            }
        }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    /// `Err(AppError::InvalidFields)` if anything was recorded.
    pub fn finish(self) -> AppResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(self.0))
        }
    }
}

/// Trim an optional input; whitespace-only counts as absent.
pub fn present(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_treats_blank_as_absent() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(Some("   \t")), None);
        assert_eq!(present(Some("  x ")), Some("x"));
    }

    #[test]
    fn test_field_errors_collects_failures() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.check::<i32>(Ok(1)), Some(1));
        assert!(errors.is_empty());
        assert_eq!(errors.check::<i32>(Err(ValidationError::required("a"))), None);
        errors.push(ValidationError::required("b"));
        match errors.finish() {
            Err(AppError::InvalidFields(v)) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v[0].field, "a");
                assert_eq!(v[1].code, "required");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
