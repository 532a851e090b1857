use serde::Deserialize;

use super::{
    present, EmailValidator, FieldErrors, FullNameValidator, NotesValidator, PhoneValidator,
    ShortTextValidator, ValidationError, Validator, NON_FIELD_ERRORS,
};
use crate::db::models::{Category, LeadChanges, LeadSource, LeadStatus, NewLead};
use crate::error::AppResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLeadRequest {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

/// Admin-side edit. An empty `notes` string clears the notes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: Option<String>,
    pub source: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

fn choice<T>(
    errors: &mut FieldErrors,
    field: &str,
    input: Option<&str>,
    parse: fn(&str) -> Option<T>,
    choices: fn() -> String,
) -> Option<T> {
    let value = input?;
    let parsed = parse(value);
    if parsed.is_none() {
        errors.push(ValidationError::invalid_choice(field, value, &choices()));
    }
    parsed
}

pub struct LeadValidator;

impl LeadValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a whole submission. Every failing field is reported, and the
    /// contact-channel rule is evaluated even when other fields fail.
    pub fn validate(&self, req: &CreateLeadRequest) -> AppResult<NewLead> {
        let mut errors = FieldErrors::new();

        let full_name = match req.full_name.as_deref() {
            Some(v) => errors.check(FullNameValidator::new().clean(v)),
            None => {
                errors.push(ValidationError::required("full_name"));
                None
            }
        };

        let position = match req.position.as_deref() {
            Some(v) => errors.check(ShortTextValidator::position().clean(v)),
            None => {
                errors.push(ValidationError::required("position"));
                None
            }
        };

        let company_name = present(req.company_name.as_deref())
            .and_then(|v| errors.check(ShortTextValidator::company_name().clean(v)));

        let phone_input = present(req.phone_number.as_deref());
        let phone_number = phone_input.and_then(|v| errors.check(PhoneValidator::new().clean(v)));

        let email_input = present(req.email.as_deref());
        let email = email_input.and_then(|v| errors.check(EmailValidator::new().clean(v)));

        let source = choice(&mut errors, "source", req.source.as_deref(), LeadSource::parse, LeadSource::choices);
        let status = choice(&mut errors, "status", req.status.as_deref(), LeadStatus::parse, LeadStatus::choices);
        let category = choice(&mut errors, "category", req.category.as_deref(), Category::parse, Category::choices);

        let notes = match req.notes.as_deref() {
            Some(v) => errors
                .check(NotesValidator::new().clean(v))
                .filter(|n| !n.is_empty()),
            None => None,
        };

        if email_input.is_none() && phone_input.is_none() {
            errors.push(ValidationError::new(
                NON_FIELD_ERRORS,
                "missing_contact",
                "Either email or phone number must be provided.",
            ));
        }

        errors.finish()?;

        // finish() guarantees the required fields were cleaned.
        match (full_name, position) {
            (Some(full_name), Some(position)) => Ok(NewLead {
                full_name,
                position,
                company_name,
                phone_number,
                email,
                source: source.unwrap_or_default(),
                status: status.unwrap_or_default(),
                notes,
                category: category.unwrap_or_default(),
            }),
            _ => Err(crate::error::AppError::Internal(
                "lead validation accepted a submission without required fields".to_string(),
            )),
        }
    }

    pub fn validate_update(&self, req: &UpdateLeadRequest) -> AppResult<LeadChanges> {
        let mut errors = FieldErrors::new();

        let status = choice(&mut errors, "status", req.status.as_deref(), LeadStatus::parse, LeadStatus::choices);
        let source = choice(&mut errors, "source", req.source.as_deref(), LeadSource::parse, LeadSource::choices);
        let category = choice(&mut errors, "category", req.category.as_deref(), Category::parse, Category::choices);

        let notes = match req.notes.as_deref() {
            Some(v) => errors
                .check(NotesValidator::new().clean(v))
                .map(|n| if n.is_empty() { None } else { Some(n) }),
            None => None,
        };

        errors.finish()?;

        Ok(LeadChanges { status, source, category, notes })
    }
}

impl Default for LeadValidator {
    fn default() -> Self {
        Self::new()
    }
}
