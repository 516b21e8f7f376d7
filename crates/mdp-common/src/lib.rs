//! MDP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the MDP workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all MDP workspace
//! members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing-based logging configuration and initialization
//! - **Checksums**: Content integrity verification for downloaded media
//!
//! # Example
//!
//! ```no_run
//! use mdp_common::{Result, MdpError};
//! use mdp_common::checksum::sha256_file;
//!
//! fn inspect(path: &str) -> Result<()> {
//!     let digest = sha256_file(path)?;
//!     tracing::info!(%digest, "media file digest");
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{MdpError, Result};
