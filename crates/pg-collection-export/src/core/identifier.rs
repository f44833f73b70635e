//! Identifier validation for dynamically built SQL.
//!
//! Table and column names are supplied by the operator and interpolated
//! unquoted, so that schema-qualified names (`blog.posts`) and PostgreSQL's
//! case folding keep working. Only values that can never form a valid
//! identifier are rejected here.

use crate::error::{ExportError, Result};

/// Maximum identifier length accepted (PostgreSQL truncates at 63 bytes per
/// part; a qualified name can be longer).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier.
///
/// Rejects:
/// - Empty or whitespace-only identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `ExportError::Config` naming `what` (e.g. "table") and the value.
pub fn validate_identifier(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ExportError::Config(format!("{} name cannot be empty", what)));
    }

    if name.contains('\0') {
        return Err(ExportError::Config(format!(
            "{} name contains a null byte: {:?}",
            what, name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(ExportError::Config(format!(
            "{} name exceeds maximum length of {} bytes (got {} bytes): {:?}",
            what,
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a PostgreSQL identifier using double quotes.
///
/// Used for names reported back by the server, which are already resolved
/// and must keep their exact spelling.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
