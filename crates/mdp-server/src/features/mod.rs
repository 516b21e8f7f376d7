//! Feature modules
//!
//! Each feature owns its routes plus per-operation command (write) and
//! query (read) modules.

pub mod businesses;

use axum::Router;
use sqlx::PgPool;

/// Build the combined feature router, nested under `/api/v1` by the caller.
pub fn router() -> Router<PgPool> {
    Router::new().nest("/businesses", businesses::routes::businesses_routes())
}
