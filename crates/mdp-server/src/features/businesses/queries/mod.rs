//! Read operations for medical businesses

pub mod get;
pub mod list;

pub use get::{GetBusinessError, GetBusinessQuery};
pub use list::{ListBusinessesError, ListBusinessesQuery};
