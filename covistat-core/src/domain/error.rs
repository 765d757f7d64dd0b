// covistat-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DataLoadError {
    #[error("Input file not found: '{0}'")]
    #[diagnostic(
        code(covistat::domain::load::not_found),
        help("Check that the uploaded file was stored at the expected path.")
    )]
    FileNotFound(String),

    #[error("Could not read input file '{path}': {source}")]
    #[diagnostic(code(covistat::domain::load::unreadable))]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed delimited data: {0}")]
    #[diagnostic(
        code(covistat::domain::load::parse),
        help("Every row must carry the same number of fields as the header.")
    )]
    Parse(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum AggregationError {
    #[error("Required column '{0}' not present in the dataset")]
    #[diagnostic(
        code(covistat::domain::aggregate::missing_column),
        help("The dataset must carry 'country', 'new_cases', 'new_deaths' and 'vaccinated'.")
    )]
    ColumnNotFound(String),

    #[error("Column '{0}' is not numeric and cannot be aggregated")]
    #[diagnostic(code(covistat::domain::aggregate::non_numeric))]
    NonNumericMeasure(String),

    #[error("Failed to write artifact '{artifact}': {source}")]
    #[diagnostic(
        code(covistat::domain::aggregate::artifact_write),
        help("Check disk space and permissions on the output directory.")
    )]
    ArtifactWrite {
        artifact: String,
        #[source]
        source: std::io::Error,
    },
}
