use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sqlx::{query_as, SqlitePool};

use crate::db::search;

choice_enum! {
    /// Where a lead came from.
    LeadSource default Other {
        Website => ("website", "Website"),
        Referral => ("referral", "Referral"),
        ColdCall => ("cold_call", "Cold Call"),
        LinkedIn => ("linkedin", "LinkedIn"),
        EmailCampaign => ("email_campaign", "Email Campaign"),
        Other => ("other", "Other"),
    }
}

choice_enum! {
    /// Sales pipeline stage. Only changed through the admin API.
    LeadStatus default New {
        New => ("new", "New"),
        Contacted => ("contacted", "Contacted"),
        Interested => ("interested", "Interested"),
        NotInterested => ("not_interested", "Not Interested"),
        Converted => ("converted", "Converted"),
        Closed => ("closed", "Closed"),
    }
}

choice_enum! {
    /// Line of business a lead or client belongs to.
    Category default WebDev {
        WebDev => ("web_dev", "Web Development"),
        MobileDev => ("mobile_dev", "Mobile Development"),
        AutomatedTesting => ("automated_testing", "Automated Testing"),
        SocialMediaAuto => ("social_media_auto", "Social Media Automation"),
        EcommerceAuto => ("ecommerce_auto", "E-commerce Automation"),
        SalesAuto => ("sales_auto", "Sales Automation"),
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Lead {
    pub id: i64,
    pub full_name: String,
    pub position: String,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub source: String,
    pub status: String,
    pub notes: Option<String>,
    pub category: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A validated lead, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub full_name: String,
    pub position: String,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub notes: Option<String>,
    pub category: Category,
}

/// Admin-side changes to an existing lead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadChanges {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub category: Option<Category>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadOrder {
    /// Insertion order.
    Id,
    NewestFirst,
}

#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub category: Option<Category>,
    pub search: Vec<String>,
}

const LEAD_COLUMNS: &str = "id, full_name, position, company_name, phone_number, email, \
     source, status, notes, category, created_at, updated_at";

const SEARCH_COLUMNS: &[&str] = &["full_name", "company_name", "email", "phone_number"];

pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub struct LeadRepository;

impl LeadRepository {
    pub async fn insert(pool: &SqlitePool, lead: &NewLead) -> Result<Lead, sqlx::Error> {
        let now = timestamp_now();
        let sql = format!(
            "INSERT INTO leads (full_name, position, company_name, phone_number, email, source, status, notes, category, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {LEAD_COLUMNS}"
        );
        query_as::<_, Lead>(&sql)
            .bind(&lead.full_name)
            .bind(&lead.position)
            .bind(&lead.company_name)
            .bind(&lead.phone_number)
            .bind(&lead.email)
            .bind(lead.source.as_str())
            .bind(lead.status.as_str())
            .bind(&lead.notes)
            .bind(lead.category.as_str())
            .bind(&now)
            .bind(&now)
            .fetch_one(pool)
            .await
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Lead>, sqlx::Error> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?");
        query_as::<_, Lead>(&sql).bind(id).fetch_optional(pool).await
    }

    pub async fn list(
        pool: &SqlitePool,
        filter: &LeadFilter,
        order: LeadOrder,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let mut conditions = Vec::<String>::new();
        if filter.status.is_some() {
            conditions.push("status = ?".to_string());
        }
        if filter.source.is_some() {
            conditions.push("source = ?".to_string());
        }
        if filter.category.is_some() {
            conditions.push("category = ?".to_string());
        }
        for _ in &filter.search {
            conditions.push(search::any_column_like(SEARCH_COLUMNS));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let order_clause = match order {
            LeadOrder::Id => "ORDER BY id ASC",
            LeadOrder::NewestFirst => "ORDER BY created_at DESC, id DESC",
        };
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads {where_clause} {order_clause}");

        let mut q = query_as::<_, Lead>(&sql);
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(source) = filter.source {
            q = q.bind(source.as_str());
        }
        if let Some(category) = filter.category {
            q = q.bind(category.as_str());
        }
        for term in &filter.search {
            let pattern = search::contains_pattern(term);
            for _ in SEARCH_COLUMNS {
                q = q.bind(pattern.clone());
            }
        }
        q.fetch_all(pool).await
    }

    /// Apply `changes` and bump `updated_at`. Returns `None` when the lead does not exist.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        changes: &LeadChanges,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let Some(existing) = Self::get(pool, id).await? else {
            return Ok(None);
        };

        let status = changes.status.map(|s| s.as_str().to_string()).unwrap_or(existing.status);
        let source = changes.source.map(|s| s.as_str().to_string()).unwrap_or(existing.source);
        let category = changes.category.map(|c| c.as_str().to_string()).unwrap_or(existing.category);
        let notes = changes.notes.clone().unwrap_or(existing.notes);
        let now = timestamp_now();

        let sql = format!(
            "UPDATE leads SET status = ?, source = ?, category = ?, notes = ?, updated_at = ?
             WHERE id = ?
             RETURNING {LEAD_COLUMNS}"
        );
        query_as::<_, Lead>(&sql)
            .bind(&status)
            .bind(&source)
            .bind(&category)
            .bind(&notes)
            .bind(&now)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a lead; its client row goes with it through the foreign key.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
