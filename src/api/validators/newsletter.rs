use serde::Deserialize;

use super::{EmailValidator, FieldErrors, ValidationError, Validator};
use crate::db::models::NewSubscriber;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSubscriberRequest {
    pub email: Option<String>,
    pub is_subscribed: Option<bool>,
}

pub struct NewsletterValidator;

impl NewsletterValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, req: &CreateSubscriberRequest) -> AppResult<NewSubscriber> {
        let mut errors = FieldErrors::new();

        let email = match req.email.as_deref() {
            Some(v) => errors.check(EmailValidator::new().clean(v)),
            None => {
                errors.push(ValidationError::required("email"));
                None
            }
        };

        errors.finish()?;

        let email = email.ok_or_else(|| {
            AppError::Internal("newsletter validation accepted a submission without email".to_string())
        })?;

        Ok(NewSubscriber {
            email,
            is_subscribed: req.is_subscribed.unwrap_or(true),
        })
    }
}

impl Default for NewsletterValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(req: CreateSubscriberRequest) -> Vec<String> {
        match NewsletterValidator::new().validate(&req) {
            Err(AppError::InvalidFields(errors)) => errors.into_iter().map(|e| e.code).collect(),
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_subscriber_defaults_to_subscribed() {
        let sub = NewsletterValidator::new()
            .validate(&CreateSubscriberRequest {
                email: Some(" News@Example.org ".to_string()),
                is_subscribed: None,
            })
            .unwrap();
        assert_eq!(sub.email, "news@example.org");
        assert!(sub.is_subscribed);
    }

    #[test]
    fn test_explicit_unsubscribed() {
        let sub = NewsletterValidator::new()
            .validate(&CreateSubscriberRequest {
                email: Some("a@example.org".to_string()),
                is_subscribed: Some(false),
            })
            .unwrap();
        assert!(!sub.is_subscribed);
    }

    #[test]
    fn test_missing_and_blank_email() {
        assert_eq!(codes(CreateSubscriberRequest::default()), vec!["required"]);
        assert_eq!(
            codes(CreateSubscriberRequest { email: Some("  ".to_string()), is_subscribed: None }),
            vec!["blank"]
        );
    }

    #[test]
    fn test_disposable_email() {
        assert_eq!(
            codes(CreateSubscriberRequest {
                email: Some("a@mailinator.com".to_string()),
                is_subscribed: None,
            }),
            vec!["disposable"]
        );
    }
}
