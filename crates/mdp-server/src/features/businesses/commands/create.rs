//! Create business command
//!
//! Command: pure data structure with validation. Handler: standalone async
//! function owning the database operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Command to register a new medical business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBusinessCommand {
    /// Display name of the business
    pub name: String,

    /// Telegram channel username the business was observed on
    pub channel_username: String,

    /// Optional category (e.g. "pharmacy", "cosmetics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response from creating a business
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CreateBusinessResponse {
    pub id: i64,
    pub name: String,
    pub channel_username: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when creating a business
#[derive(Debug, thiserror::Error)]
pub enum CreateBusinessError {
    #[error("Name is required")]
    NameRequired,

    #[error("Name must be at most 256 characters")]
    NameLength,

    #[error("Channel username is required")]
    ChannelRequired,

    #[error("Channel username must be lowercase alphanumeric")]
    ChannelFormat,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateBusinessCommand {
    /// Validates the command parameters
    pub fn validate(&self) -> Result<(), CreateBusinessError> {
        if self.name.trim().is_empty() {
            return Err(CreateBusinessError::NameRequired);
        }
        if self.name.len() > 256 {
            return Err(CreateBusinessError::NameLength);
        }
        if self.channel_username.trim().is_empty() {
            return Err(CreateBusinessError::ChannelRequired);
        }
        if !self
            .channel_username
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(CreateBusinessError::ChannelFormat);
        }
        Ok(())
    }
}

/// Handler function for creating businesses
#[tracing::instrument(
    skip(pool, command),
    fields(name = %command.name, channel = %command.channel_username)
)]
pub async fn handle(
    pool: PgPool,
    command: CreateBusinessCommand,
) -> Result<CreateBusinessResponse, CreateBusinessError> {
    command.validate()?;

    tracing::info!("Creating medical business");

    let created = sqlx::query_as::<_, CreateBusinessResponse>(
        r#"
        INSERT INTO medical_businesses (name, channel_username, category, description)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, channel_username, category, description, created_at
        "#,
    )
    .bind(&command.name)
    .bind(&command.channel_username)
    .bind(&command.category)
    .bind(&command.description)
    .fetch_one(&pool)
    .await?;

    tracing::info!(business_id = created.id, "Medical business created");

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> CreateBusinessCommand {
        CreateBusinessCommand {
            name: "Lobelia Cosmetics".to_string(),
            channel_username: "lobelia4cosmetics".to_string(),
            category: Some("cosmetics".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(command().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut cmd = command();
        cmd.name = "  ".to_string();
        assert!(matches!(cmd.validate(), Err(CreateBusinessError::NameRequired)));
    }

    #[test]
    fn test_long_name_rejected() {
        let mut cmd = command();
        cmd.name = "x".repeat(257);
        assert!(matches!(cmd.validate(), Err(CreateBusinessError::NameLength)));
    }

    #[test]
    fn test_channel_format_rejected() {
        let mut cmd = command();
        cmd.channel_username = "CheMed123".to_string();
        assert!(matches!(cmd.validate(), Err(CreateBusinessError::ChannelFormat)));
    }
}
