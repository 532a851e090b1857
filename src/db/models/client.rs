use serde::{Serialize, Serializer};
use sqlx::{query_as, SqlitePool};
use std::fmt;

use super::lead::Category;
use crate::db::search;

/// Non-negative money amount in cents, at most 10 digits with 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cents(pub i64);

impl Cents {
    /// 99,999,999.99
    pub const MAX: Cents = Cents(9_999_999_999);

    /// Parse a decimal string such as `"1200"`, `"1200.5"` or `"1200.50"`.
    pub fn parse(input: &str) -> Result<Cents, &'static str> {
        let s = input.trim();
        if s.starts_with('-') {
            return Err("Ensure this value is greater than or equal to 0.");
        }
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err("A valid number is required.");
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err("A valid number is required.");
        }
        if frac.len() > 2 {
            return Err("Ensure that there are no more than 2 decimal places.");
        }
        let whole_digits = whole.trim_start_matches('0');
        if whole_digits.len() > 8 {
            return Err("Ensure that there are no more than 8 digits before the decimal point.");
        }

        let whole_value: i64 = if whole_digits.is_empty() { 0 } else {
            whole_digits.parse().map_err(|_| "A valid number is required.")?
        };
        let frac_value: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| "A valid number is required.")? * 10,
            _ => frac.parse().map_err(|_| "A valid number is required.")?,
        };
        Ok(Cents(whole_value * 100 + frac_value))
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientRow {
    pub id: i64,
    pub lead_id: Option<i64>,
    pub lead_full_name: Option<String>,
    pub team_id: String,
    pub monthly_charge_cents: Option<i64>,
    pub one_time_charge_cents: Option<i64>,
    pub contract_file: Option<String>,
    pub short_description: Option<String>,
    pub category: String,
}

/// A converted lead with billing terms attached.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    pub id: i64,
    pub lead_id: Option<i64>,
    pub lead_full_name: Option<String>,
    pub team_id: String,
    pub monthly_charge: Option<Cents>,
    pub one_time_charge: Option<Cents>,
    pub contract_file: Option<String>,
    pub short_description: Option<String>,
    pub category: String,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            lead_id: row.lead_id,
            lead_full_name: row.lead_full_name,
            team_id: row.team_id,
            monthly_charge: row.monthly_charge_cents.map(Cents),
            one_time_charge: row.one_time_charge_cents.map(Cents),
            contract_file: row.contract_file,
            short_description: row.short_description,
            category: row.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub lead_id: Option<i64>,
    pub team_id: String,
    pub monthly_charge: Option<Cents>,
    pub one_time_charge: Option<Cents>,
    pub contract_file: Option<String>,
    pub short_description: Option<String>,
    pub category: Category,
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub category: Option<Category>,
    pub search: Vec<String>,
}

const CLIENT_SELECT: &str = "SELECT c.id, c.lead_id, l.full_name AS lead_full_name, c.team_id, \
     c.monthly_charge_cents, c.one_time_charge_cents, c.contract_file, c.short_description, c.category \
     FROM clients c LEFT JOIN leads l ON l.id = c.lead_id";

const SEARCH_COLUMNS: &[&str] = &["c.team_id", "l.full_name"];

pub struct ClientRepository;

impl ClientRepository {
    pub async fn insert(pool: &SqlitePool, client: &NewClient) -> Result<Client, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO clients (lead_id, team_id, monthly_charge_cents, one_time_charge_cents, contract_file, short_description, category)
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(client.lead_id)
        .bind(&client.team_id)
        .bind(client.monthly_charge.map(|c| c.0))
        .bind(client.one_time_charge.map(|c| c.0))
        .bind(&client.contract_file)
        .bind(&client.short_description)
        .bind(client.category.as_str())
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();
        let sql = format!("{CLIENT_SELECT} WHERE c.id = ?");
        let row = query_as::<_, ClientRow>(&sql).bind(id).fetch_one(pool).await?;
        Ok(row.into())
    }

    pub async fn for_lead(pool: &SqlitePool, lead_id: i64) -> Result<Option<Client>, sqlx::Error> {
        let sql = format!("{CLIENT_SELECT} WHERE c.lead_id = ?");
        let row = query_as::<_, ClientRow>(&sql)
            .bind(lead_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Client::from))
    }

    /// Ordered by lead, unattached clients last.
    pub async fn list(pool: &SqlitePool, filter: &ClientFilter) -> Result<Vec<Client>, sqlx::Error> {
        let mut conditions = Vec::<String>::new();
        if filter.category.is_some() {
            conditions.push("c.category = ?".to_string());
        }
        for _ in &filter.search {
            conditions.push(search::any_column_like(SEARCH_COLUMNS));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "{CLIENT_SELECT} {where_clause} ORDER BY c.lead_id IS NULL, c.lead_id ASC, c.id ASC"
        );

        let mut q = query_as::<_, ClientRow>(&sql);
        if let Some(category) = filter.category {
            q = q.bind(category.as_str());
        }
        for term in &filter.search {
            let pattern = search::contains_pattern(term);
            for _ in SEARCH_COLUMNS {
                q = q.bind(pattern.clone());
            }
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().map(Client::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(Cents::parse("1200"), Ok(Cents(120_000)));
        assert_eq!(Cents::parse("1200.5"), Ok(Cents(120_050)));
        assert_eq!(Cents::parse("1200.05"), Ok(Cents(120_005)));
        assert_eq!(Cents::parse("0"), Ok(Cents(0)));
        assert_eq!(Cents::parse(".75"), Ok(Cents(75)));
        assert_eq!(Cents::parse("99999999.99"), Ok(Cents::MAX));
    }

    #[test]
    fn test_parse_money_rejects_bad_input() {
        assert!(Cents::parse("-1").is_err());
        assert!(Cents::parse("1.234").is_err());
        assert!(Cents::parse("100000000").is_err());
        assert!(Cents::parse("abc").is_err());
        assert!(Cents::parse("").is_err());
        assert!(Cents::parse(".").is_err());
        assert!(Cents::parse("1e5").is_err());
    }

    #[test]
    fn test_display_money() {
        assert_eq!(Cents(120_050).to_string(), "1200.50");
        assert_eq!(Cents(5).to_string(), "0.05");
        assert_eq!(serde_json::to_value(Cents(100)).unwrap(), serde_json::json!("1.00"));
    }
}
