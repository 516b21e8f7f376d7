//! MDP Server Library
//!
//! HTTP façade and database-adjacent pipelines for the medical-channel data
//! platform.
//!
//! # Overview
//!
//! - **API Endpoints**: REST create/list/get over the medical business store
//! - **Detection Pipeline**: object detection over ingested media with
//!   existence-check deduplication before insert
//! - **Database**: PostgreSQL via SQLx, DDL applied from `migrations/`
//! - **Configuration**: environment-based, loaded once at startup
//!
//! The server consumes nothing from the ingestion core at runtime; it reads
//! the media directory the ingester populates and keeps its own tables.
//!
//! # Framework Stack
//!
//! - **Axum**: web framework
//! - **SQLx**: asynchronous PostgreSQL driver
//! - **Tower / tower-http**: middleware (tracing, CORS, compression)

pub mod api;
pub mod config;
pub mod detect;
pub mod error;
pub mod features;
pub mod middleware;

pub use config::Config;
pub use error::AppError;
