//! # Store
//!
//! SQLite-backed relational store for nldb: four fixed tables
//! (departments, employees, products, orders), sample-data seeding, and
//! raw SQL query execution with dynamically decoded rows.
//!
//! Each interaction opens a fresh connection and closes it afterwards.
//! There is no pooling and no shared mutable state across requests.

pub mod connection;
pub mod entity;
pub mod error;
pub mod query;
pub mod schema;
pub mod seed;

pub use connection::connect;
pub use entity::EntityKind;
pub use error::{Result, StoreError};
pub use query::{QueryRows, fetch_by_ids, run_query};
pub use schema::init_schema;
pub use seed::{SeedBatch, seed_sample_data};
