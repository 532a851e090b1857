use std::collections::HashMap;

pub mod admin;
pub mod health;
pub mod leads;
pub mod metrics;
pub mod newsletter;

/// Raw query parameters. A repeated key keeps its last value.
pub type QueryMap = HashMap<String, String>;

/// Non-empty value of `key`, if any.
pub fn query_value<'a>(query: &'a QueryMap, key: &str) -> Option<&'a str> {
    query.get(key).map(String::as_str).filter(|v| !v.is_empty())
}
