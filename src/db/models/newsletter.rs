use serde::Serialize;
use sqlx::{query_as, SqlitePool};

use crate::db::search;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscriber {
    pub email: String,
    pub is_subscribed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewsletterFilter {
    pub is_subscribed: Option<bool>,
    pub search: Vec<String>,
}

impl NewsletterFilter {
    /// `true` and `1` (any case) mean subscribed; any other present value means unsubscribed.
    pub fn parse_is_subscribed(raw: Option<&str>) -> Option<bool> {
        raw.map(|v| matches!(v.to_lowercase().as_str(), "true" | "1"))
    }
}

pub struct NewsletterRepository;

impl NewsletterRepository {
    pub async fn insert(pool: &SqlitePool, sub: &NewSubscriber) -> Result<Subscriber, sqlx::Error> {
        query_as::<_, Subscriber>(
            "INSERT INTO newsletter_subscribers (email, is_subscribed) VALUES (?, ?)
             RETURNING id, email, is_subscribed"
        )
        .bind(&sub.email)
        .bind(sub.is_subscribed)
        .fetch_one(pool)
        .await
    }

    pub async fn list(pool: &SqlitePool, filter: &NewsletterFilter) -> Result<Vec<Subscriber>, sqlx::Error> {
        let mut conditions = Vec::<String>::new();
        if filter.is_subscribed.is_some() {
            conditions.push("is_subscribed = ?".to_string());
        }
        for _ in &filter.search {
            conditions.push(search::any_column_like(&["email"]));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT id, email, is_subscribed FROM newsletter_subscribers {where_clause} ORDER BY id ASC"
        );

        let mut q = query_as::<_, Subscriber>(&sql);
        if let Some(subscribed) = filter.is_subscribed {
            q = q.bind(subscribed);
        }
        for term in &filter.search {
            q = q.bind(search::contains_pattern(term));
        }
        q.fetch_all(pool).await
    }

    pub async fn set_subscribed(
        pool: &SqlitePool,
        id: i64,
        subscribed: bool,
    ) -> Result<Option<Subscriber>, sqlx::Error> {
        query_as::<_, Subscriber>(
            "UPDATE newsletter_subscribers SET is_subscribed = ? WHERE id = ?
             RETURNING id, email, is_subscribed"
        )
        .bind(subscribed)
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
