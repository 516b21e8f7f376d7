//! List businesses query

use super::get::BusinessView;
use crate::api::response::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const MAX_PER_PAGE: i64 = 100;

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    20
}

/// Query parameters for listing businesses
#[derive(Debug, Clone, Deserialize)]
pub struct ListBusinessesQuery {
    #[serde(default = "default_page")]
    pub page: i64,

    #[serde(default = "default_per_page")]
    pub per_page: i64,

    /// Optional filter by channel username (exact match)
    #[serde(default)]
    pub channel: Option<String>,
}

/// Page of businesses plus pagination metadata
#[derive(Debug, Serialize)]
pub struct ListBusinessesResponse {
    pub items: Vec<BusinessView>,
    pub pagination: PaginationMeta,
}

/// Errors that can occur when listing businesses
#[derive(Debug, thiserror::Error)]
pub enum ListBusinessesError {
    #[error("Page must be at least 1")]
    InvalidPage,

    #[error("Per-page must be between 1 and {MAX_PER_PAGE}")]
    InvalidPerPage,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ListBusinessesQuery {
    /// Validates the query parameters
    pub fn validate(&self) -> Result<(), ListBusinessesError> {
        if self.page < 1 {
            return Err(ListBusinessesError::InvalidPage);
        }
        if self.per_page < 1 || self.per_page > MAX_PER_PAGE {
            return Err(ListBusinessesError::InvalidPerPage);
        }
        Ok(())
    }
}

/// Handler function for listing businesses
#[tracing::instrument(skip(pool, query), fields(page = query.page, per_page = query.per_page))]
pub async fn handle(
    pool: PgPool,
    query: ListBusinessesQuery,
) -> Result<ListBusinessesResponse, ListBusinessesError> {
    query.validate()?;

    let offset = (query.page - 1) * query.per_page;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM medical_businesses
        WHERE ($1::text IS NULL OR channel_username = $1)
        "#,
    )
    .bind(&query.channel)
    .fetch_one(&pool)
    .await?;

    let items = sqlx::query_as::<_, BusinessView>(
        r#"
        SELECT id, name, channel_username, category, description, created_at
        FROM medical_businesses
        WHERE ($1::text IS NULL OR channel_username = $1)
        ORDER BY id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&query.channel)
    .bind(query.per_page)
    .bind(offset)
    .fetch_all(&pool)
    .await?;

    Ok(ListBusinessesResponse {
        pagination: PaginationMeta::new(query.page, query.per_page, total),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: i64, per_page: i64) -> ListBusinessesQuery {
        ListBusinessesQuery {
            page,
            per_page,
            channel: None,
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(query(default_page(), default_per_page()).validate().is_ok());
    }

    #[test]
    fn test_zero_page_rejected() {
        assert!(matches!(
            query(0, 20).validate(),
            Err(ListBusinessesError::InvalidPage)
        ));
    }

    #[test]
    fn test_oversized_per_page_rejected() {
        assert!(matches!(
            query(1, 101).validate(),
            Err(ListBusinessesError::InvalidPerPage)
        ));
    }
}
