//! PostgreSQL row source.

use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::StreamExt;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio_postgres::types::{FromSql, Type};
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{tls, RowSource, Rows};
use crate::config::{DatabaseConfig, SslMode};
use crate::core::identifier::quote_identifier;
use crate::core::{Row, SqlValue};
use crate::error::{ExportError, Result};

/// A single PostgreSQL connection.
///
/// Dropping the source closes the connection; [`PgSource::close`] does the
/// same and waits for the connection task to finish.
pub struct PgSource {
    client: Client,
    connection: JoinHandle<()>,
}

impl PgSource {
    /// Open a connection and check it with `SELECT 1`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            "Opening connection: {{Host: {}, Port: {}, DBName: {}, User: {}, Password: [REDACTED], SslMode: {}}}",
            config.host, config.port, config.database, config.user, config.ssl_mode
        );

        let pg_config = config.pg_config();
        let (client, connection) = match config.ssl_mode {
            SslMode::Disable => {
                let (client, conn) = pg_config.connect(NoTls).await?;
                (client, spawn_connection(conn))
            }
            SslMode::VerifyFull => {
                let (client, conn) = pg_config.connect(tls::verified_connector()).await?;
                (client, spawn_connection(conn))
            }
        };

        client.simple_query("SELECT 1").await?;

        info!(
            "Connected to PostgreSQL: {}:{}/{}",
            config.host, config.port, config.database
        );

        Ok(Self { client, connection })
    }

    /// Close the connection and wait for its task to end.
    pub async fn close(self) {
        drop(self.client);
        if let Err(e) = self.connection.await {
            error!("PostgreSQL connection task failed: {}", e);
        }
        debug!("PostgreSQL connection closed");
    }
}

#[async_trait]
impl RowSource for PgSource {
    async fn count_rows(&self, table: &str) -> Result<i64> {
        let query = count_query(table);
        debug!("Counting rows: {}", query);

        let row = self.client.query_one(query.as_str(), &[]).await?;
        let count: i64 = row
            .try_get(0)
            .map_err(|e| ExportError::row_scan("count", "int8", e.to_string()))?;
        Ok(count)
    }

    async fn probe(&self, query: &str) -> Result<()> {
        let query = probe_query(&self.readable_query(query).await?);
        debug!("Probing: {}", query);

        for row in self.client.query(query.as_str(), &[]).await? {
            convert_row(&row)?;
        }
        Ok(())
    }

    async fn stream_rows(&self, query: &str) -> Result<Rows> {
        let query = self.readable_query(query).await?;
        let rows = self
            .client
            .query_raw(query.as_str(), std::iter::empty::<&str>())
            .await?;

        Ok(rows
            .map(|row| -> Result<Row> { convert_row(&row?) })
            .boxed())
    }

    fn db_type(&self) -> &str {
        "postgres"
    }
}

impl PgSource {
    /// Prepare `query` and, if any result column has a type without a native
    /// conversion, rewrite it so that column is read as `::text`.
    async fn readable_query(&self, query: &str) -> Result<String> {
        let statement = self.client.prepare(query).await?;
        let columns: Vec<(&str, &Type)> = statement
            .columns()
            .iter()
            .map(|c| (c.name(), c.type_()))
            .collect();

        match text_cast_query(query, &columns) {
            Some(rewritten) => {
                let cast: Vec<String> = columns
                    .iter()
                    .filter(|(_, ty)| !is_native_type(ty))
                    .map(|(name, ty)| format!("{} ({})", name, ty))
                    .collect();
                info!("Reading as text: {}", cast.join(", "));
                debug!("Rewritten query: {}", rewritten);
                Ok(rewritten)
            }
            None => Ok(query.to_string()),
        }
    }
}

/// Drive the connection on a background task until the client is dropped.
fn spawn_connection<F>(connection: F) -> JoinHandle<()>
where
    F: Future<Output = std::result::Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {}", e);
        }
    })
}

fn count_query(table: &str) -> String {
    format!("SELECT COUNT(*) AS count FROM {}", table)
}

fn probe_query(query: &str) -> String {
    format!("{} LIMIT 1", query)
}

/// Types decoded into a dedicated [`SqlValue`] variant (or into text, for
/// uuid and json).
const NATIVE_TYPES: &[&str] = &[
    "bool",
    "int2",
    "int4",
    "int8",
    "oid",
    "float4",
    "float8",
    "numeric",
    "timestamptz",
    "timestamp",
    "date",
    "uuid",
    "json",
    "jsonb",
];

/// Whether a column of type `ty` can be decoded without a cast.
fn is_native_type(ty: &Type) -> bool {
    NATIVE_TYPES.contains(&ty.name()) || <String as FromSql>::accepts(ty)
}

/// Wrap `query` so every non-native column is cast to text, keeping column
/// order and output names. Returns `None` when no cast is needed.
///
/// The inner columns are renamed positionally (`c1`, `c2`, ...) so repeated
/// column names stay unambiguous.
fn text_cast_query(query: &str, columns: &[(&str, &Type)]) -> Option<String> {
    if columns.iter().all(|(_, ty)| is_native_type(ty)) {
        return None;
    }

    let mut select = Vec::with_capacity(columns.len());
    let mut aliases = Vec::with_capacity(columns.len());
    for (idx, (name, ty)) in columns.iter().enumerate() {
        let alias = format!("c{}", idx + 1);
        let cast = if is_native_type(ty) { "" } else { "::text" };
        select.push(format!("{}{} AS {}", alias, cast, quote_identifier(name)));
        aliases.push(alias);
    }

    Some(format!(
        "SELECT {} FROM ({}) AS q({})",
        select.join(", "),
        query,
        aliases.join(", ")
    ))
}

/// Convert every column of a fetched row.
fn convert_row(row: &tokio_postgres::Row) -> Result<Row> {
    (0..row.len()).map(|idx| convert_value(row, idx)).collect()
}

fn convert_value(row: &tokio_postgres::Row, idx: usize) -> Result<SqlValue> {
    row.try_get::<_, PgValue>(idx)
        .map(|v| v.0)
        .map_err(|e| {
            let column = &row.columns()[idx];
            ExportError::row_scan(column.name(), column.type_().name(), e.to_string())
        })
}

type DecodeError = Box<dyn std::error::Error + Sync + Send>;

/// A column value decoded from the PostgreSQL binary format, dispatched on
/// the column's type name.
struct PgValue(SqlValue);

impl<'a> FromSql<'a> for PgValue {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> std::result::Result<Self, DecodeError> {
        let value: SqlValue = match ty.name() {
            "bool" => bool::from_sql(ty, raw)?.into(),
            "int2" => i16::from_sql(ty, raw)?.into(),
            "int4" => i32::from_sql(ty, raw)?.into(),
            "int8" => i64::from_sql(ty, raw)?.into(),
            "oid" => u32::from_sql(ty, raw)?.into(),
            "float4" => f32::from_sql(ty, raw)?.into(),
            "float8" => f64::from_sql(ty, raw)?.into(),
            "numeric" => Decimal::from_sql(ty, raw)?.into(),
            "timestamptz" => DateTime::<Utc>::from_sql(ty, raw)?.into(),
            "timestamp" => NaiveDateTime::from_sql(ty, raw)?.into(),
            "date" => NaiveDate::from_sql(ty, raw)?.into(),
            "uuid" => SqlValue::Text(Uuid::from_sql(ty, raw)?.hyphenated().to_string()),
            "json" | "jsonb" => SqlValue::Text(serde_json::Value::from_sql(ty, raw)?.to_string()),
            _ if <String as FromSql>::accepts(ty) => String::from_sql(ty, raw)?.into(),
            _ => return Err(format!("unsupported column type {}", ty).into()),
        };
        Ok(PgValue(value))
    }

    fn from_sql_null(_: &Type) -> std::result::Result<Self, DecodeError> {
        Ok(PgValue(SqlValue::Null))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}
