//! pg-collection-export CLI - export PostgreSQL rows as front-matter documents.

use clap::Parser;
use pg_collection_export::{
    ensure_directory_exists, ColumnMapping, DatabaseConfig, ExportConfig, ExportError,
    ExportSummary, Exporter, PgSource, Roles, SslMode, DEFAULT_PG_PORT,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "pg-collection-export")]
#[command(about = "Export PostgreSQL rows as front-matter documents, one file per row")]
#[command(version)]
struct Cli {
    /// Source table (may be schema-qualified)
    table: String,

    /// Existing directory that receives the generated documents
    collection_path: PathBuf,

    /// Column used to build each file name
    file_name_key: String,

    /// Column written as the document body
    content_key: String,

    /// Timestamp column used as the YYYY-MM-DD- file name prefix
    date_key: String,

    /// Front matter mapping: column=key pairs joined by ':' (key '-' reads the column without writing it)
    front_matter: String,

    /// Database host, optionally with :port
    #[arg(long, env = "DBHOST")]
    db_host: String,

    /// Database port, used when the host has none
    #[arg(long, env = "DBPORT", default_value_t = DEFAULT_PG_PORT)]
    db_port: u16,

    /// Database name
    #[arg(long, env = "DBNAME")]
    db_name: String,

    /// Database user
    #[arg(long, env = "DBUSER")]
    db_user: String,

    /// Database password
    #[arg(long, env = "DBPASS", default_value = "", hide_env_values = true, hide_default_value = true)]
    db_password: String,

    /// TLS mode: disable or verify-full
    #[arg(long, env = "DBSSLMODE", default_value = "disable")]
    ssl_mode: String,

    /// Transform every row but write no files
    #[arg(long)]
    dry_run: bool,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), ExportError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = ExportConfig {
        table: cli.table,
        collection_path: cli.collection_path,
        roles: Roles::new(cli.file_name_key, cli.content_key, cli.date_key),
        front_matter: ColumnMapping::parse(&cli.front_matter)?,
        dry_run: cli.dry_run,
    };
    config.validate()?;
    info!(
        "Args: {{Table: {}, CollectionPath: {}, FileNameKey: {}, ContentKey: {}, DateKey: {}, FrontMatter: {}}}",
        config.table,
        config.collection_path.display(),
        config.roles.file_name,
        config.roles.content,
        config.roles.date,
        config.front_matter
    );

    let database = DatabaseConfig::from_host_arg(
        &cli.db_host,
        cli.db_port,
        cli.db_name,
        cli.db_user,
        cli.db_password,
        cli.ssl_mode.parse::<SslMode>()?,
    )?;
    database.validate()?;

    // Fail on a bad output directory before touching the database.
    ensure_directory_exists(&config.collection_path).await?;

    let source = PgSource::connect(&database).await?;
    let result = Exporter::new(&source, config).run().await;
    source.close().await;
    let summary = result?;

    if cli.output_json {
        println!("{}", summary.to_json()?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &ExportSummary) {
    let status_msg = if summary.dry_run {
        "Dry run completed!"
    } else {
        "Export completed!"
    };
    println!("\n{}", status_msg);
    println!("  Table: {}", summary.table);
    println!("  Collection: {}", summary.collection_path.display());
    println!("  Rows: {}", summary.rows_read);
    println!("  Files: {}", summary.files_written);
    println!("  Skipped: {}", summary.rows_skipped);
    println!("  Duration: {:.2}s", summary.duration_seconds);
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
