//! Free-text search helpers shared by the list endpoints.
//!
//! A search string is split on whitespace and commas; each term must match at
//! least one of the searched columns as a case-insensitive substring.

/// Split a raw `?search=` value into terms. Empty input yields no terms.
pub fn terms(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build a `LIKE` pattern matching `term` anywhere, escaping `%`, `_` and `\`.
/// Pair with `ESCAPE '\'` in SQL.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// SQL fragment requiring one term to match any of `columns`.
pub fn any_column_like(columns: &[&str]) -> String {
    let parts: Vec<String> = columns
        .iter()
        .map(|c| format!("{c} LIKE ? ESCAPE '\\'"))
        .collect();
    format!("({})", parts.join(" OR "))
}
