// frbhost-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(frbhost::infra::database::duckdb),
        help("DuckDB could not read the input table.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Unsupported value in column '{column}': {kind}")]
    #[diagnostic(code(frbhost::infra::database::value))]
    UnsupportedValue { column: String, kind: String },
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (table ingest) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(frbhost::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Refusing to overwrite existing file '{0}'")]
    #[diagnostic(code(frbhost::infra::exists))]
    OutputExists(String),

    // --- CONFIG / YAML / JSON ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(frbhost::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(frbhost::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(frbhost::infra::template),
        help("Check the Jinja syntax of the configuration template.")
    )]
    TemplateError(#[from] minijinja::Error),

    // --- FITS CODEC ---
    #[error("FITS Error in '{path}': {reason}")]
    #[diagnostic(code(frbhost::infra::fits))]
    Fits { path: String, reason: String },

    // --- EXTERNAL TOOLS ---
    #[error("External command '{command}' failed: {reason}")]
    #[diagnostic(
        code(frbhost::infra::command),
        help("Check that the tool is installed and on PATH, or set its command in frbhost.yaml.")
    )]
    CommandFailed { command: String, reason: String },

    #[error("Output directory '{target}' overlaps CIGALE output '{source_dir}'")]
    #[diagnostic(
        code(frbhost::infra::output_overlap),
        help("Pick an output directory outside of, and not containing, out/.")
    )]
    OutputOverlap { source_dir: String, target: String },

    #[error("Filter '{0}' not found in the filter catalog")]
    #[diagnostic(code(frbhost::infra::filter))]
    UnknownFilter(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
