//! # SQL Generation
//!
//! This crate turns a natural-language question into a SQL statement via an
//! LLM, and gates the result behind a read-only keyword guard.
//!
//! The guard is a denylist, not a parser. It is trivially bypassable by
//! obfuscation and is a best-effort check, not a security boundary.

pub mod error;
pub mod generator;
pub mod guard;

pub use error::{Result, SqlGenError};
pub use generator::{GeminiSqlGenerator, SCHEMA_DESCRIPTION, SqlGenerator, strip_code_fences};
pub use guard::{GuardError, check_sql};
