use std::io;

use thiserror::Error;

/// A malformed CNF text. Only the load that produced it fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing problem line")]
    MissingProblemLine,
    #[error("line {line}: clause appears before the problem line")]
    ClauseBeforeProblemLine { line: usize },
    #[error("line {line}: already have a problem line")]
    DuplicateProblemLine { line: usize },
    #[error("line {line}: unable to parse problem line `{text}`")]
    MalformedProblemLine { line: usize, text: String },
    #[error("line {line}: unknown token `{token}`")]
    BadToken { line: usize, token: String },
    #[error("line {line}: variable {variable} is too large")]
    VariableOutOfRange { line: usize, variable: usize },
    #[error("line {line}: clause is not terminated by 0")]
    UnterminatedClause { line: usize },
    #[error(
        "header declares {declared_vars} variables and {declared_clauses} clauses, \
         found {found_vars} variables and {found_clauses} clauses"
    )]
    CountMismatch {
        declared_vars: usize,
        declared_clauses: usize,
        found_vars: usize,
        found_clauses: usize,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("0 is not a literal")]
    ZeroLiteral,
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("noise probability {0} is outside [0, 1]")]
    InvalidNoise(f64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
