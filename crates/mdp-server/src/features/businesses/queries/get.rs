//! Get business query

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Query for a single business by id
#[derive(Debug, Clone, Deserialize)]
pub struct GetBusinessQuery {
    pub id: i64,
}

/// A business row as returned by read queries
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessView {
    pub id: i64,
    pub name: String,
    pub channel_username: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when fetching a business
#[derive(Debug, thiserror::Error)]
pub enum GetBusinessError {
    #[error("Business {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handler function for fetching one business
#[tracing::instrument(skip(pool, query), fields(id = query.id))]
pub async fn handle(pool: PgPool, query: GetBusinessQuery) -> Result<BusinessView, GetBusinessError> {
    let business = sqlx::query_as::<_, BusinessView>(
        r#"
        SELECT id, name, channel_username, category, description, created_at
        FROM medical_businesses
        WHERE id = $1
        "#,
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?;

    business.ok_or(GetBusinessError::NotFound(query.id))
}
