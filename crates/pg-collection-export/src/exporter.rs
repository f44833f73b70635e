//! Export driver.
//!
//! Checks that the collection directory exists and that the table can be
//! queried, then streams `SELECT <mapped columns> FROM <table>` and writes
//! one document per row. Rows are handled strictly in result-set order, one
//! at a time; the first database or write error ends the run.

use std::path::{Path, PathBuf};
use std::time::Instant;

use futures::TryStreamExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};
use crate::source::RowSource;
use crate::transform::{Document, DocumentTemplate};

/// Outcome of a completed export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Source table.
    pub table: String,
    /// Directory the documents were written to.
    pub collection_path: PathBuf,
    /// Rows returned by the query.
    pub rows_read: u64,
    /// Documents written (or, in a dry run, that would have been written).
    pub files_written: u64,
    /// Rows without a usable file name.
    pub rows_skipped: u64,
    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
    /// Whether writes were suppressed.
    pub dry_run: bool,
}

impl ExportSummary {
    /// Serialize the summary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Drives one export run over a [`RowSource`].
pub struct Exporter<'a, S: RowSource + ?Sized> {
    source: &'a S,
    config: ExportConfig,
    template: DocumentTemplate,
}

impl<'a, S: RowSource + ?Sized> Exporter<'a, S> {
    pub fn new(source: &'a S, config: ExportConfig) -> Self {
        let template = DocumentTemplate::new(config.front_matter.clone(), config.roles.clone());
        Self {
            source,
            config,
            template,
        }
    }

    /// Run the preflight checks, then export every row.
    pub async fn run(&self) -> Result<ExportSummary> {
        let started = Instant::now();
        let query = self.config.select_query();

        ensure_directory_exists(&self.config.collection_path).await?;
        self.ensure_table_is_accessible(&query).await?;

        let mut summary = ExportSummary {
            table: self.config.table.clone(),
            collection_path: self.config.collection_path.clone(),
            rows_read: 0,
            files_written: 0,
            rows_skipped: 0,
            duration_seconds: 0.0,
            dry_run: self.config.dry_run,
        };

        info!("Querying: {}", query);
        let mut rows = self.source.stream_rows(&query).await?;

        while let Some(row) = rows.try_next().await? {
            summary.rows_read += 1;

            let Some(document) = self.template.render(&row) else {
                warn!(
                    "Skipping row because the file name could not be determined: {:?}",
                    row
                );
                summary.rows_skipped += 1;
                continue;
            };

            self.write_document(&document).await?;
            summary.files_written += 1;
        }

        summary.duration_seconds = started.elapsed().as_secs_f64();
        info!(
            "Export of {} finished: {} rows, {} files, {} skipped in {:.2}s",
            summary.table,
            summary.rows_read,
            summary.files_written,
            summary.rows_skipped,
            summary.duration_seconds
        );

        Ok(summary)
    }

    /// Count the table's rows and run the export query limited to one row.
    async fn ensure_table_is_accessible(&self, query: &str) -> Result<()> {
        let count = self.source.count_rows(&self.config.table).await?;
        info!("Processing {} rows...", count);

        self.source.probe(query).await?;
        debug!(
            "Table {} is readable from {}",
            self.config.table,
            self.source.db_type()
        );
        Ok(())
    }

    /// Write a document into the collection, replacing any existing file.
    async fn write_document(&self, document: &Document) -> Result<()> {
        let path = self.config.collection_path.join(&document.file_name);

        if self.config.dry_run {
            info!(
                "Dry run: would write {} ({} bytes)",
                path.display(),
                document.body.len()
            );
            return Ok(());
        }

        info!("{} writing...", document.file_name);
        tokio::fs::write(&path, document.body.as_bytes())
            .await
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        info!("{} complete", document.file_name);

        Ok(())
    }
}

/// Fail unless `path` exists and is a directory. The directory is never
/// created.
pub async fn ensure_directory_exists(path: &Path) -> Result<()> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|source| ExportError::Directory {
            path: path.to_path_buf(),
            source,
        })?;

    if !metadata.is_dir() {
        return Err(ExportError::Directory {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "not a directory"),
        });
    }

    Ok(())
}
