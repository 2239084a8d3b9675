//! MongoDB connector and shared connection utilities
//!
//! This library owns everything about getting a healthy MongoDB client:
//! configuration, connection (with optional retry/backoff), and health
//! checks. Domain crates receive a [`mongodb::Database`] handle and never
//! deal with connection management themselves.
//!
//! # Features
//!
//! - `config` - load [`mongodb::MongoConfig`] from environment variables via
//!   `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb;
//!
//! let client = mongodb::connect("mongodb://localhost:27017").await?;
//! let db = client.database("tours");
//! let collection = db.collection::<Tour>("tours");
//! ```

pub mod common;
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult};
