// frbhost-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Column '{0}' not found in the table")]
    #[diagnostic(
        code(frbhost::domain::missing_column),
        help("Check the column names of the input catalog.")
    )]
    MissingColumn(String),

    #[error("No identifier column found (no column name contains '{0}')")]
    #[diagnostic(
        code(frbhost::domain::identifier),
        help("Add an identifier column such as 'ID' or 'objID'.")
    )]
    MissingIdentifier(String),

    #[error("Several identifier candidates found: {0:?}")]
    #[diagnostic(
        code(frbhost::domain::identifier),
        help("Drop or rename all but one of these columns.")
    )]
    AmbiguousIdentifier(Vec<String>),

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    #[diagnostic(code(frbhost::domain::table_shape))]
    RowCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Column '{0}' is not numeric")]
    #[diagnostic(code(frbhost::domain::column_type))]
    NotNumeric(String),

    #[error("Missing SED parameters for modules: {0:?}")]
    #[diagnostic(
        code(frbhost::domain::sed_params),
        help("A custom module list needs a parameter set for every module.")
    )]
    ModuleParamsMissing(Vec<String>),

    #[error("Invalid FRB name: '{0}'")]
    #[diagnostic(code(frbhost::domain::frb_name))]
    InvalidFrbName(String),

    #[error("Invalid coordinate '{value}': {reason}")]
    #[diagnostic(code(frbhost::domain::coordinates))]
    InvalidCoordinate { value: String, reason: String },

    #[error("Record {name} failed vetting: {details}")]
    #[diagnostic(
        code(frbhost::domain::vetting),
        help("Every record needs coordinates, DM and DM_ISM before it can be written.")
    )]
    IncompleteRecord { name: String, details: String },
}
