//! Write operations for medical businesses

pub mod create;

pub use create::{CreateBusinessCommand, CreateBusinessError, CreateBusinessResponse};
