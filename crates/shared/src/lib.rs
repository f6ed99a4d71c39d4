//! Shared types, errors, and configuration for finledger.
//!
//! This crate provides common types used across all other crates:
//! - Money with truncating 2-decimal scale and a closed currency set
//! - Typed IDs for type-safe entity references
//! - Pagination types for list queries
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
