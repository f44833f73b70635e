//! Configuration types and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use tokio_postgres::Config as PgConfig;

impl ExportConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_export(self)
    }
}

impl DatabaseConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_database(self)
    }

    /// Build the tokio-postgres connection configuration.
    pub fn pg_config(&self) -> PgConfig {
        let mut pg_config = PgConfig::new();
        pg_config.host(&self.host);
        pg_config.port(self.port);
        pg_config.dbname(&self.database);
        pg_config.user(&self.user);
        if !self.password.is_empty() {
            pg_config.password(&self.password);
        }
        pg_config.application_name("pg-collection-export");
        pg_config
    }
}
