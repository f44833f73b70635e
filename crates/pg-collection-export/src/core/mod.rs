//! Core types shared by the transformer, the row source and the exporter.
//!
//! - [`mapping`]: column-to-header mapping parsed from the front-matter argument
//! - [`value`]: typed scalar values of a fetched row
//! - [`identifier`]: validation of table and column names used in SQL

pub mod identifier;
pub mod mapping;
pub mod value;

pub use mapping::{ColumnMapping, FrontMatterField, IGNORE_KEY};
pub use value::{Row, SqlValue};
