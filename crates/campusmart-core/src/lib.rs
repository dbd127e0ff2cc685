//! # Campusmart Core
//!
//! Core types, errors, and utilities shared by every Campusmart crate.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page-based pagination parameters and result pages
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Query string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use campusmart_core::errors::AppError;
//! use campusmart_core::pagination::PaginationParams;
//!
//! let error = AppError::not_found(anyhow::anyhow!("Listing not found"));
//!
//! let params = PaginationParams::default();
//! let skip = params.offset();
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{Page, PaginationParams};
pub use password::{hash_password, verify_password};
