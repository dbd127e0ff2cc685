//! # Campusmart CLI
//!
//! Operator tooling for Campusmart: admin account creation and demo data
//! seeding.
//!
//! ## Usage
//!
//! ```ignore
//! use campusmart_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(20); // 20 students with default content
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
