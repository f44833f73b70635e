//! Row sources.
//!
//! The exporter only needs three things from a database: a row count, a
//! probe that a query runs, and a row-by-row stream of a query's results.
//! [`RowSource`] captures that; [`PgSource`] implements it for PostgreSQL.

mod postgres;
mod tls;

pub use postgres::PgSource;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::core::Row;
use crate::error::Result;

/// Stream of converted rows, consumed one at a time.
pub type Rows = BoxStream<'static, Result<Row>>;

/// Read rows from a source database.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// `SELECT COUNT(*)` over `table`.
    async fn count_rows(&self, table: &str) -> Result<i64>;

    /// Run `query` limited to one row and convert it, discarding the result.
    ///
    /// Fails on the same errors the full query would hit, before any file is
    /// written.
    async fn probe(&self, query: &str) -> Result<()>;

    /// Execute `query` once and stream its rows in result-set order.
    async fn stream_rows(&self, query: &str) -> Result<Rows>;

    /// Get the database type identifier (e.g., "postgres").
    fn db_type(&self) -> &str;
}
