use serde::Deserialize;
use serde_json::Value;

use super::{present, FieldErrors, ValidationError};
use crate::db::models::{Category, Cents, NewClient};
use crate::error::{AppError, AppResult};

pub const MAX_TEAM_ID: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateClientRequest {
    pub lead_id: Option<i64>,
    pub team_id: Option<String>,
    /// Decimal as a string (`"1200.50"`) or a JSON number.
    pub monthly_charge: Option<Value>,
    pub one_time_charge: Option<Value>,
    pub contract_file: Option<String>,
    pub short_description: Option<String>,
    pub category: Option<String>,
}

fn money(errors: &mut FieldErrors, field: &str, input: Option<&Value>) -> Option<Cents> {
    let raw = match input? {
        Value::Null => return None,
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => {
            errors.push(ValidationError::new(field, "invalid", "A valid number is required."));
            return None;
        }
    };
    match Cents::parse(&raw) {
        Ok(cents) => Some(cents),
        Err(message) => {
            errors.push(ValidationError::new(field, "invalid", message));
            None
        }
    }
}

pub struct ClientValidator;

impl ClientValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, req: &CreateClientRequest) -> AppResult<NewClient> {
        let mut errors = FieldErrors::new();

        let team_id = match present(req.team_id.as_deref()) {
            Some(t) if t.chars().count() > MAX_TEAM_ID => {
                errors.push(ValidationError::new(
                    "team_id",
                    "too_long",
                    format!("Ensure this field has no more than {} characters.", MAX_TEAM_ID),
                ));
                None
            }
            Some(t) => Some(t.to_string()),
            None => {
                errors.push(ValidationError::required("team_id"));
                None
            }
        };

        let monthly_charge = money(&mut errors, "monthly_charge", req.monthly_charge.as_ref());
        let one_time_charge = money(&mut errors, "one_time_charge", req.one_time_charge.as_ref());

        let category = match req.category.as_deref() {
            Some(value) => {
                let parsed = Category::parse(value);
                if parsed.is_none() {
                    errors.push(ValidationError::invalid_choice("category", value, &Category::choices()));
                }
                parsed
            }
            None => None,
        };

        if let Some(id) = req.lead_id {
            if id <= 0 {
                errors.push(ValidationError::new("lead_id", "invalid", "Invalid lead id."));
            }
        }

        errors.finish()?;

        let team_id = team_id.ok_or_else(|| {
            AppError::Internal("client validation accepted a submission without team_id".to_string())
        })?;

        Ok(NewClient {
            lead_id: req.lead_id,
            team_id,
            monthly_charge,
            one_time_charge,
            contract_file: present(req.contract_file.as_deref()).map(str::to_string),
            short_description: present(req.short_description.as_deref()).map(str::to_string),
            category: category.unwrap_or_default(),
        })
    }
}

impl Default for ClientValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_client() {
        let req: CreateClientRequest = serde_json::from_value(json!({
            "lead_id": 3,
            "team_id": " team-7 ",
            "monthly_charge": "1200.50",
            "one_time_charge": 300,
            "category": "mobile_dev",
        }))
        .unwrap();
        let client = ClientValidator::new().validate(&req).unwrap();
        assert_eq!(client.team_id, "team-7");
        assert_eq!(client.monthly_charge, Some(Cents(120_050)));
        assert_eq!(client.one_time_charge, Some(Cents(30_000)));
        assert_eq!(client.category, Category::MobileDev);
        assert_eq!(client.lead_id, Some(3));
    }

    #[test]
    fn test_negative_charge_and_missing_team() {
        let req: CreateClientRequest = serde_json::from_value(json!({
            "monthly_charge": "-5",
            "one_time_charge": true,
        }))
        .unwrap();
        match ClientValidator::new().validate(&req) {
            Err(AppError::InvalidFields(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["team_id", "monthly_charge", "one_time_charge"]);
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_null_charge_is_absent() {
        let req: CreateClientRequest = serde_json::from_value(json!({
            "team_id": "t",
            "monthly_charge": null,
            "one_time_charge": "",
        }))
        .unwrap();
        let client = ClientValidator::new().validate(&req).unwrap();
        assert_eq!(client.monthly_charge, None);
        assert_eq!(client.one_time_charge, None);
        assert_eq!(client.category, Category::WebDev);
    }
}
