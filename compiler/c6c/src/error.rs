//! Driver failures.
//!
//! Source-level problems (lexical and syntax errors) are not `CliError`s:
//! they are rendered diagnostics collected in an [`Outcome`](crate::Outcome).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing value for `{0}`")]
    MissingValue(&'static str),

    #[error("invalid value `{value}` for `{option}`")]
    InvalidValue { option: &'static str, value: String },

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("cannot start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
