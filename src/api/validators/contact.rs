use regex::Regex;
use std::sync::LazyLock;

use super::{ValidationError, Validator};

/// Providers of throwaway inboxes. Leads and subscribers must stay reachable.
pub const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "throwaway.email",
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "maildrop.cc",
];

pub const MAX_EMAIL_LEN: usize = 254;

static EMAIL_LOCAL_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("Invalid regex")
});

static EMAIL_DOMAIN_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9-]{2,63}$")
        .expect("Invalid regex")
});

static PHONE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9]{7,15}$").expect("Invalid regex")
});

/// Case-insensitive check of the part after the last `@`.
pub fn is_disposable(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) => {
            let domain = domain.to_lowercase();
            DISPOSABLE_DOMAINS.contains(&domain.as_str())
        }
        None => false,
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    EMAIL_LOCAL_PART.is_match(local)
        && EMAIL_DOMAIN_PART.is_match(domain)
        && !domain.ends_with('-')
}

/// Syntax and disposable-domain check. Returns the address trimmed and lower-cased.
pub struct EmailValidator {
    field: &'static str,
}

impl EmailValidator {
    pub fn new() -> Self {
        Self { field: "email" }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn clean(&self, input: &str) -> Result<String, ValidationError> {
        let s = input.trim();

        if s.is_empty() {
            return Err(ValidationError::new(self.field, "blank", "Email cannot be empty."));
        }

        if s.chars().count() > MAX_EMAIL_LEN {
            return Err(ValidationError::new(
                self.field,
                "too_long",
                format!("Ensure this field has no more than {} characters.", MAX_EMAIL_LEN),
            ));
        }

        if !is_valid_email(s) {
            return Err(ValidationError::new(self.field, "invalid", "Enter a valid email address."));
        }

        if is_disposable(s) {
            return Err(ValidationError::new(
                self.field,
                "disposable",
                "Disposable email addresses are not allowed.",
            ));
        }

        Ok(s.to_lowercase())
    }
}

pub struct PhoneValidator;

impl PhoneValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhoneValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for PhoneValidator {
    fn clean(&self, input: &str) -> Result<String, ValidationError> {
        let s = input.trim();
        if !PHONE_NUMBER.is_match(s) {
            return Err(ValidationError::new(
                "phone_number",
                "invalid",
                "Enter a valid international phone number.",
            ));
        }
        Ok(s.to_string())
    }
}
