use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to allocate solver scratch storage")]
    MemoryAlloc,
    #[error("over-determined problem: {rows} constraint rows but only {vars} tableau variables")]
    OverDetermination { rows: usize, vars: usize },
    #[error("the problem is infeasible")]
    Infeasible,
    #[error("the problem is unbounded")]
    Unbounded,
    #[error("the objective stalled on a degenerate basis")]
    Degeneracy,
    #[error("iteration limit of {limit} rounds reached")]
    IterationLimit { limit: usize },
    #[error("numerical precision error: no pivot satisfies the tolerances")]
    PrecisionError,
    #[error("{context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid solver options: {0}")]
    InvalidOptions(&'static str),
    #[error("the linear system is singular")]
    Singular,
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn parse<S: Into<String>>(line: usize, message: S) -> Error {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}
