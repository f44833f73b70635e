//! Row-to-document transformation.
//!
//! A [`DocumentTemplate`] turns one fetched row into a [`Document`]: a file
//! name derived from the file name column (optionally prefixed with the date
//! column as `YYYY-MM-DD-`) and a body made of a `---` delimited front-matter
//! block followed by the content column.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::Roles;
use crate::core::{ColumnMapping, SqlValue};

/// Delimiter line around the front-matter block.
pub const FRONT_MATTER_DELIMITER: &str = "---\n";

/// Extension appended to every generated file name.
pub const FILE_EXTENSION: &str = ".md";

/// A generated document, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub body: String,
}

/// Static per-run configuration of the row transformation.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    mapping: ColumnMapping,
    roles: Roles,
}

impl DocumentTemplate {
    pub fn new(mapping: ColumnMapping, roles: Roles) -> Self {
        Self { mapping, roles }
    }

    /// Render one row.
    ///
    /// Returns `None` when no file name can be derived: the file name column
    /// is not mapped, is NULL, or is blank after trimming. Columns are
    /// visited in mapping order and NULL values are skipped entirely.
    pub fn render(&self, row: &[SqlValue]) -> Option<Document> {
        debug_assert_eq!(
            row.len(),
            self.mapping.len(),
            "row width must match the column mapping"
        );

        let mut file_name: Option<String> = None;
        let mut content = String::new();
        let mut date: Option<DateTime<Utc>> = None;
        let mut headers = String::new();

        for (field, value) in self.mapping.fields().iter().zip(row) {
            if value.is_null() {
                continue;
            }

            if field.column == self.roles.file_name {
                let raw = value.to_string();
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return None;
                }
                file_name = Some(format!("{}{}", sanitize_file_name(trimmed), FILE_EXTENSION));
            } else if field.column == self.roles.content {
                content = value.to_string();
            } else if field.column == self.roles.date {
                date = value.as_timestamp();
                if date.is_none() {
                    warn!(
                        "Date column '{}' holds a {} value, not a timestamp; no date prefix",
                        field.column,
                        value.type_name()
                    );
                }
            }

            if field.is_ignored() {
                continue;
            }

            headers.push_str(&field.key);
            headers.push_str(": ");
            headers.push_str(&value.header_value());
            headers.push('\n');
        }

        let mut file_name = file_name?;
        if let Some(prefix) = date.and_then(date_prefix) {
            file_name.insert_str(0, &prefix);
        }

        let mut body = String::with_capacity(
            2 * FRONT_MATTER_DELIMITER.len() + headers.len() + content.len(),
        );
        body.push_str(FRONT_MATTER_DELIMITER);
        body.push_str(&headers);
        body.push_str(FRONT_MATTER_DELIMITER);
        body.push_str(&content);

        Some(Document { file_name, body })
    }
}

/// Turn a raw title into a file name stem.
///
/// Spaces become hyphens, the result is lowercased, and anything other than
/// ASCII letters, digits and hyphens is dropped. Idempotent.
pub fn sanitize_file_name(raw: &str) -> String {
    raw.replace(' ', "-")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// `YYYY-MM-DD-` for dates at least one whole second after the Unix epoch.
fn date_prefix(date: DateTime<Utc>) -> Option<String> {
    (date.timestamp() > 0).then(|| date.format("%Y-%m-%d-").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn template() -> DocumentTemplate {
        DocumentTemplate::new(
            ColumnMapping::parse("id=-:title=title:published=date:body=-").unwrap(),
            Roles::new("title", "body", "published"),
        )
    }

    fn published() -> SqlValue {
        SqlValue::Timestamp(Utc.with_ymd_and_hms(2021, 5, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_end_to_end_document() {
        let row = vec![
            SqlValue::Int(7),
            SqlValue::from("Hello World!"),
            published(),
            SqlValue::from("Text."),
        ];

        let doc = template().render(&row).unwrap();
        assert_eq!(doc.file_name, "2021-05-01-hello-world.md");
        assert_eq!(
            doc.body,
            "---\ntitle: \"Hello World!\"\ndate: 2021-05-01T00:00:00Z\n---\nText."
        );
    }

    #[test]
    fn test_date_column_with_ignored_key() {
        let template = DocumentTemplate::new(
            ColumnMapping::parse("id=-:title=title:published=-:body=-").unwrap(),
            Roles::new("title", "body", "published"),
        );
        let row = vec![
            SqlValue::Int(7),
            SqlValue::from("Hello World!"),
            published(),
            SqlValue::from("Text."),
        ];

        let doc = template.render(&row).unwrap();
        assert_eq!(doc.file_name, "2021-05-01-hello-world.md");
        assert_eq!(doc.body, "---\ntitle: \"Hello World!\"\n---\nText.");
    }

    #[test]
    fn test_blank_title_skips_row() {
        let row = vec![
            SqlValue::Int(7),
            SqlValue::from("   "),
            published(),
            SqlValue::from("Text."),
        ];
        assert_eq!(template().render(&row), None);
    }

    #[test]
    fn test_null_title_skips_row() {
        let row = vec![SqlValue::Int(7), SqlValue::Null, published(), SqlValue::from("Text.")];
        assert_eq!(template().render(&row), None);
    }

    #[test]
    fn test_unmapped_file_name_column_skips_row() {
        let template = DocumentTemplate::new(
            ColumnMapping::parse("id=-:body=-").unwrap(),
            Roles::new("title", "body", "published"),
        );
        let row = vec![SqlValue::Int(1), SqlValue::from("Text.")];
        assert_eq!(template.render(&row), None);
    }

    #[test]
    fn test_null_values_are_omitted() {
        let row = vec![SqlValue::Null, SqlValue::from("Post"), SqlValue::Null, SqlValue::Null];
        let doc = template().render(&row).unwrap();
        assert_eq!(doc.file_name, "post.md");
        assert_eq!(doc.body, "---\ntitle: \"Post\"\n---\n");
    }

    #[test]
    fn test_epoch_date_has_no_prefix() {
        let row = vec![
            SqlValue::Int(1),
            SqlValue::from("Post"),
            SqlValue::Timestamp(Utc.timestamp_opt(0, 0).unwrap()),
            SqlValue::Null,
        ];
        assert_eq!(template().render(&row).unwrap().file_name, "post.md");
    }

    #[test]
    fn test_pre_epoch_date_has_no_prefix() {
        let row = vec![
            SqlValue::Int(1),
            SqlValue::from("Post"),
            SqlValue::Timestamp(Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 0).unwrap()),
            SqlValue::Null,
        ];
        assert_eq!(template().render(&row).unwrap().file_name, "post.md");
    }

    #[test]
    fn test_date_just_after_epoch_has_prefix() {
        let row = vec![
            SqlValue::Int(1),
            SqlValue::from("Post"),
            SqlValue::Timestamp(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 1).unwrap()),
            SqlValue::Null,
        ];
        assert_eq!(template().render(&row).unwrap().file_name, "1970-01-01-post.md");
    }

    #[test]
    fn test_non_timestamp_date_is_ignored() {
        let row = vec![
            SqlValue::Int(1),
            SqlValue::from("Post"),
            SqlValue::from("2021-05-01"),
            SqlValue::Null,
        ];
        let doc = template().render(&row).unwrap();
        assert_eq!(doc.file_name, "post.md");
        assert!(doc.body.contains("date: \"2021-05-01\"\n"));
    }

    #[test]
    fn test_header_escapes_double_quotes() {
        let row = vec![
            SqlValue::Int(1),
            SqlValue::from(r#"Say "Hi""#),
            SqlValue::Null,
            SqlValue::Null,
        ];
        let doc = template().render(&row).unwrap();
        assert_eq!(doc.file_name, "say-hi.md");
        assert!(doc.body.contains("title: \"Say \\\"Hi\\\"\"\n"));
    }

    #[test]
    fn test_headers_follow_mapping_order_and_types() {
        let template = DocumentTemplate::new(
            ColumnMapping::parse("slug=-:draft=draft:rating=rating:views=views:tag=category")
                .unwrap(),
            Roles::new("slug", "body", "published"),
        );
        let row = vec![
            SqlValue::from("my-post"),
            SqlValue::Bool(false),
            SqlValue::Float(4.5),
            SqlValue::Int(1200),
            SqlValue::from("rust"),
        ];

        let doc = template.render(&row).unwrap();
        assert_eq!(doc.file_name, "my-post.md");
        assert_eq!(
            doc.body,
            "---\ndraft: false\nrating: 4.5\nviews: 1200\ncategory: \"rust\"\n---\n"
        );
    }

    #[test]
    fn test_file_name_column_also_emits_header() {
        let template = DocumentTemplate::new(
            ColumnMapping::parse("title=title").unwrap(),
            Roles::new("title", "title", "title"),
        );
        let doc = template.render(&[SqlValue::from("Same Column")]).unwrap();
        assert_eq!(doc.file_name, "same-column.md");
        assert_eq!(doc.body, "---\ntitle: \"Same Column\"\n---\n");
    }

    #[test]
    fn test_numeric_file_name() {
        let template = DocumentTemplate::new(
            ColumnMapping::parse("id=-:body=-").unwrap(),
            Roles::new("id", "body", "published"),
        );
        let doc = template
            .render(&[SqlValue::Int(42), SqlValue::from("# Heading\n")])
            .unwrap();
        assert_eq!(doc.file_name, "42.md");
        assert_eq!(doc.body, "---\n---\n# Heading\n");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Hello World!"), "hello-world");
        assert_eq!(sanitize_file_name("C'est la Vie"), "cest-la-vie");
        assert_eq!(sanitize_file_name("Ünïcödé  Title"), "ncd--title");
        assert_eq!(sanitize_file_name("tabs\tand_underscores"), "tabsandunderscores");
    }

    #[test]
    fn test_sanitize_file_name_is_idempotent() {
        let inputs = [
            "Hello World!",
            "  padded  ",
            "MiXeD CaSe 123",
            "already-clean",
            "Ünïcödé Ärger",
            "a/b\\c..d",
            "",
        ];
        for input in inputs {
            let once = sanitize_file_name(input);
            assert_eq!(sanitize_file_name(&once), once, "input: {:?}", input);
        }
    }
}
