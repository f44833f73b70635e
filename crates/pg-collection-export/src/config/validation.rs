//! Configuration validation.

use tracing::warn;

use super::{DatabaseConfig, ExportConfig};
use crate::core::identifier::validate_identifier;
use crate::error::{ExportError, Result};

/// Validate the export configuration.
///
/// Role columns missing from the mapping are allowed but logged: a missing
/// file name column means every row will be skipped.
pub fn validate_export(config: &ExportConfig) -> Result<()> {
    validate_identifier("table", &config.table)?;

    if config.collection_path.as_os_str().is_empty() {
        return Err(ExportError::Config("collection path is required".into()));
    }

    if config.front_matter.is_empty() {
        return Err(ExportError::Config(
            "front matter must map at least one column".into(),
        ));
    }
    for field in config.front_matter.fields() {
        validate_identifier("column", &field.column)?;
    }

    let roles = [
        ("file name", &config.roles.file_name),
        ("content", &config.roles.content),
        ("date", &config.roles.date),
    ];
    for (role, column) in roles {
        if !config.front_matter.contains_column(column) {
            warn!(
                "The {} column '{}' is not part of the front matter mapping",
                role, column
            );
        }
    }
    if !config.front_matter.contains_column(&config.roles.file_name) {
        warn!("No file name can be derived: every row will be skipped");
    }

    Ok(())
}

/// Validate the database configuration.
pub fn validate_database(config: &DatabaseConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(ExportError::Config("database host is required".into()));
    }
    if config.database.is_empty() {
        return Err(ExportError::Config("database name is required".into()));
    }
    if config.user.is_empty() {
        return Err(ExportError::Config("database user is required".into()));
    }
    if config.port == 0 {
        return Err(ExportError::Config("database port must be non-zero".into()));
    }
    Ok(())
}
