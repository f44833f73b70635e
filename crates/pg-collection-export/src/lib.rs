//! # pg-collection-export
//!
//! Export the rows of a PostgreSQL table as front-matter documents, one file
//! per row, ready to drop into a static-site collection (e.g. a Jekyll
//! `_posts` directory).
//!
//! - **Column mapping**: `column=key` pairs choose the selected columns and
//!   the header keys they are written under (`-` reads a column without
//!   writing it)
//! - **Roles**: one column names the file, one supplies the body, one adds a
//!   `YYYY-MM-DD-` date prefix
//! - **Typed rendering**: text is quoted and escaped, numbers, booleans and
//!   timestamps are written as-is
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_collection_export::{
//!     ColumnMapping, DatabaseConfig, ExportConfig, Exporter, PgSource, Roles, SslMode,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> pg_collection_export::Result<()> {
//!     let db = DatabaseConfig::from_host_arg(
//!         "localhost", 5432, "blog", "writer", "secret", SslMode::Disable,
//!     )?;
//!     let config = ExportConfig {
//!         table: "posts".into(),
//!         collection_path: "_posts".into(),
//!         roles: Roles::new("title", "body", "published"),
//!         front_matter: ColumnMapping::parse("id=-:title=title:published=-:body=-")?,
//!         dry_run: false,
//!     };
//!
//!     let source = PgSource::connect(&db).await?;
//!     let summary = Exporter::new(&source, config).run().await?;
//!     println!("Wrote {} files", summary.files_written);
//!     source.close().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod exporter;
pub mod source;
pub mod transform;

// Re-exports for convenient access
pub use config::{DatabaseConfig, ExportConfig, Roles, SslMode, DEFAULT_PG_PORT};
pub use crate::core::{ColumnMapping, FrontMatterField, Row, SqlValue, IGNORE_KEY};
pub use error::{ExportError, Result};
pub use exporter::{ensure_directory_exists, ExportSummary, Exporter};
pub use source::{PgSource, RowSource, Rows};
pub use transform::{sanitize_file_name, Document, DocumentTemplate};
