//! API infrastructure

pub mod response;

pub use response::{ApiResponse, ErrorResponse, PaginationMeta};
