//! Medical business API routes
//!
//! - `POST /api/v1/businesses` - Register a new business
//! - `GET /api/v1/businesses` - List businesses with pagination
//! - `GET /api/v1/businesses/:id` - Get a single business by id

use crate::api::response::{ApiResponse, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;

use super::{
    commands::{CreateBusinessCommand, CreateBusinessError},
    queries::{get::GetBusinessQuery, list::ListBusinessesQuery, GetBusinessError, ListBusinessesError},
};

/// Creates the businesses router with all routes configured
pub fn businesses_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_business))
        .route("/", get(list_businesses))
        .route("/:id", get(get_business))
}

/// Register a new business
///
/// `POST /api/v1/businesses`
///
/// - `201 Created` - Business registered
/// - `400 Bad Request` - Validation error
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
async fn create_business(
    State(pool): State<PgPool>,
    Json(command): Json<CreateBusinessCommand>,
) -> Result<Response, BusinessApiError> {
    let response = super::commands::create::handle(pool, command).await?;

    tracing::info!(business_id = response.id, "Business created via API");

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

/// Get a single business by id
///
/// `GET /api/v1/businesses/:id`
///
/// - `200 OK` - Business found
/// - `404 Not Found` - No business with that id
#[tracing::instrument(skip(pool))]
async fn get_business(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Response, BusinessApiError> {
    let response = super::queries::get::handle(pool, GetBusinessQuery { id }).await?;

    tracing::debug!(business_id = response.id, "Business retrieved via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// List businesses with pagination
///
/// `GET /api/v1/businesses?page=1&per_page=20&channel=chemed123`
///
/// - `200 OK` - Page of businesses with pagination metadata
/// - `400 Bad Request` - Invalid query parameters
#[tracing::instrument(skip(pool, query), fields(page = query.page, per_page = query.per_page))]
async fn list_businesses(
    State(pool): State<PgPool>,
    Query(query): Query<ListBusinessesQuery>,
) -> Result<Response, BusinessApiError> {
    let response = super::queries::list::handle(pool, query).await?;

    tracing::debug!(
        count = response.items.len(),
        total = response.pagination.total,
        "Businesses listed via API"
    );

    let meta = json!({ "pagination": response.pagination });

    Ok(
        (StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta)))
            .into_response(),
    )
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for business API endpoints
#[derive(Debug)]
enum BusinessApiError {
    Create(CreateBusinessError),
    Get(GetBusinessError),
    List(ListBusinessesError),
}

impl From<CreateBusinessError> for BusinessApiError {
    fn from(err: CreateBusinessError) -> Self {
        Self::Create(err)
    }
}

impl From<GetBusinessError> for BusinessApiError {
    fn from(err: GetBusinessError) -> Self {
        Self::Get(err)
    }
}

impl From<ListBusinessesError> for BusinessApiError {
    fn from(err: ListBusinessesError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for BusinessApiError {
    fn into_response(self) -> Response {
        match self {
            BusinessApiError::Create(CreateBusinessError::NameRequired)
            | BusinessApiError::Create(CreateBusinessError::NameLength)
            | BusinessApiError::Create(CreateBusinessError::ChannelRequired)
            | BusinessApiError::Create(CreateBusinessError::ChannelFormat) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            BusinessApiError::Create(CreateBusinessError::Database(_)) => {
                tracing::error!("Database error during business creation: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            BusinessApiError::Get(GetBusinessError::NotFound(id)) => {
                let error =
                    ErrorResponse::new("NOT_FOUND", format!("Business {} not found", id));
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },
            BusinessApiError::Get(GetBusinessError::Database(_)) => {
                tracing::error!("Database error during business retrieval: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },

            BusinessApiError::List(ListBusinessesError::InvalidPage)
            | BusinessApiError::List(ListBusinessesError::InvalidPerPage) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            BusinessApiError::List(ListBusinessesError::Database(_)) => {
                tracing::error!("Database error during business listing: {}", self);
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for BusinessApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}
