//! Medical business feature
//!
//! Plain create/list/get over the `medical_businesses` table; no business
//! logic beyond input validation.

pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{CreateBusinessCommand, CreateBusinessError, CreateBusinessResponse};
pub use queries::{GetBusinessQuery, ListBusinessesQuery};
