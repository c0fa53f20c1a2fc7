//! Common utilities shared across the catalog crates.
//!
//! This crate provides:
//! - Unified error handling with a single HTTP status table
//! - Response envelopes and pagination
//! - Configuration structures

pub mod config;
pub mod error;
pub mod pagination;
pub mod response;

pub use config::*;
pub use error::{expose_error_details, AppError, AppResult, OptionExt};
pub use pagination::{PageMeta, PaginationParams, Window};
pub use response::{ApiResponse, Created, ListResponse};
