//! Configuration type definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::ColumnMapping;
use crate::error::ExportError;

/// Default PostgreSQL port.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// What to export and where to put it.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Source table, possibly schema-qualified.
    pub table: String,

    /// Directory receiving one document per row. Must already exist.
    pub collection_path: PathBuf,

    /// Columns with special meaning.
    pub roles: Roles,

    /// Columns to select and how they appear in the header.
    pub front_matter: ColumnMapping,

    /// Transform rows but do not write any files.
    pub dry_run: bool,
}

impl ExportConfig {
    /// `SELECT <mapped columns> FROM <table>`.
    pub fn select_query(&self) -> String {
        self.front_matter.select_query(&self.table)
    }
}

/// Source columns that supply the file name, the body and the date prefix.
///
/// Matched against source column names, never against header keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roles {
    pub file_name: String,
    pub content: String,
    pub date: String,
}

impl Roles {
    pub fn new(
        file_name: impl Into<String>,
        content: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            date: date.into(),
        }
    }
}

/// Database connection configuration.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 5432).
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    pub password: String,

    /// TLS mode (default: disable).
    pub ssl_mode: SslMode,
}

impl DatabaseConfig {
    /// Build a config from a `host`, `host:port` or `[v6addr]:port` string.
    ///
    /// An explicit port in `host` wins over `default_port`. Brackets around an
    /// IPv6 address are stripped.
    pub fn from_host_arg(
        host: &str,
        default_port: u16,
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        ssl_mode: SslMode,
    ) -> crate::Result<Self> {
        let (host, port) = if let Some(rest) = host.strip_prefix('[') {
            // [v6addr] or [v6addr]:port
            let (addr, tail) = rest.split_once(']').ok_or_else(|| {
                ExportError::Config(format!("unterminated '[' in database host {:?}", host))
            })?;
            let port = match tail.strip_prefix(':') {
                Some(p) => parse_port(p)?,
                None if tail.is_empty() => default_port,
                None => {
                    return Err(ExportError::Config(format!(
                        "unexpected {:?} after ']' in database host",
                        tail
                    )))
                }
            };
            (addr.to_string(), port)
        } else {
            match host.rsplit_once(':') {
                // Bare IPv6 addresses contain colons but no port.
                Some((h, p)) if !h.contains(':') => (h.to_string(), parse_port(p)?),
                _ => (host.to_string(), default_port),
            }
        };

        Ok(Self {
            host,
            port,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            ssl_mode,
        })
    }
}

fn parse_port(p: &str) -> crate::Result<u16> {
    p.parse::<u16>()
        .map_err(|_| ExportError::Config(format!("invalid port {:?} in database host", p)))
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

/// TLS mode for the database connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    /// Plaintext connection.
    #[default]
    Disable,
    /// TLS with the server certificate verified against the webpki roots.
    VerifyFull,
}

impl FromStr for SslMode {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "verify-full" => Ok(SslMode::VerifyFull),
            other => Err(ExportError::Config(format!(
                "Invalid ssl_mode '{}'. Valid options: disable, verify-full",
                other
            ))),
        }
    }
}

impl fmt::Display for SslMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SslMode::Disable => f.write_str("disable"),
            SslMode::VerifyFull => f.write_str("verify-full"),
        }
    }
}
