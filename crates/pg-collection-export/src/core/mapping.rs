//! Column mapping between table columns and front-matter keys.

use std::fmt;

use crate::error::{ExportError, Result};

/// Output key meaning "read the column, but leave it out of the header".
pub const IGNORE_KEY: &str = "-";

/// Separator between `column=key` pairs in the front-matter argument.
const PAIR_SEPARATOR: char = ':';

/// One `column=key` pair of the front-matter argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatterField {
    /// Source column selected from the table.
    pub column: String,
    /// Header key written to the document, or [`IGNORE_KEY`].
    pub key: String,
}

impl FrontMatterField {
    pub fn new(column: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            key: key.into(),
        }
    }

    /// Whether this field is omitted from the header block.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.key == IGNORE_KEY
    }
}

impl fmt::Display for FrontMatterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.column, self.key)
    }
}

/// Ordered list of front-matter fields.
///
/// The order drives both the SELECT column list and the header line order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMapping {
    fields: Vec<FrontMatterField>,
}

impl ColumnMapping {
    pub fn new(fields: Vec<FrontMatterField>) -> Self {
        Self { fields }
    }

    /// Parse a mapping such as `id=-:title=title:body=-`.
    ///
    /// Each pair is split at its first `=`, so keys may themselves contain
    /// `=`. Empty segments, a missing `=`, or an empty column or key are
    /// rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let mut fields = Vec::new();

        for (idx, segment) in input.split(PAIR_SEPARATOR).enumerate() {
            let (column, key) = segment.split_once('=').ok_or_else(|| {
                ExportError::Config(format!(
                    "front matter entry {} ({:?}) must have the form column=key",
                    idx + 1,
                    segment
                ))
            })?;

            let column = column.trim();
            let key = key.trim();
            if column.is_empty() {
                return Err(ExportError::Config(format!(
                    "front matter entry {} ({:?}) has an empty column name",
                    idx + 1,
                    segment
                )));
            }
            if key.is_empty() {
                return Err(ExportError::Config(format!(
                    "front matter entry {} ({:?}) has an empty key; use '{}' to omit a column",
                    idx + 1,
                    segment,
                    IGNORE_KEY
                )));
            }

            fields.push(FrontMatterField::new(column, key));
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FrontMatterField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any field reads `column`.
    pub fn contains_column(&self, column: &str) -> bool {
        self.fields.iter().any(|f| f.column == column)
    }

    /// `SELECT a, b, c FROM <table>` for the mapped columns, in order.
    pub fn select_query(&self, table: &str) -> String {
        let columns = self
            .fields
            .iter()
            .map(|f| f.column.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("SELECT {} FROM {}", columns, table)
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}
