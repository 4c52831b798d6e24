//! Phase store errors.

use std::path::PathBuf;
use thiserror::Error;
use xp_core::XpError;
use xp_eos::EosError;

pub type PhaseResult<T> = Result<T, PhaseError>;

/// Why an external loader or converter rejected a file.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadFault {
    #[error("division by zero while deriving {what}")]
    ZeroDivision { what: String },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("invalid numeric value for '{field}': {value}")]
    InvalidNumber { field: String, value: String },

    /// Syntax or structure the document format cannot parse.
    #[error("malformed document: {message}")]
    Malformed { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("not supported: {what}")]
    Unsupported { what: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    /// Source file could not be turned into a phase; nothing was added or replaced.
    #[error("Could not load {} as a phase: {source}", filename.display())]
    Load {
        filename: PathBuf,
        #[source]
        source: LoadFault,
    },

    #[error("Equation of state error: {0}")]
    Eos(#[from] EosError),

    #[error("Index out of range: {what} (index={index}, len={len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Phase has no recorded source file to reload from")]
    SourceUnavailable,

    /// Unknown display unit. `fallback` holds the legacy all-zero positions.
    #[error("Unsupported position unit '{unit}'")]
    UnsupportedUnit { unit: String, fallback: Vec<f64> },

    /// Key is neither a parameter of the phase's equation of state nor one of its cell keys.
    #[error("Unknown parameter '{key}' for equation of state {eos}")]
    UnknownParameter { key: String, eos: &'static str },

    #[error("Invalid unit cell: {what}")]
    InvalidCell { what: &'static str },

    #[error("{0}")]
    Core(XpError),
}

impl From<XpError> for PhaseError {
    fn from(err: XpError) -> Self {
        match err {
            XpError::IndexOob { what, index, len } => {
                PhaseError::IndexOutOfRange { what, index, len }
            }
            other => PhaseError::Core(other),
        }
    }
}

impl PhaseError {
    /// Wrap a loader fault with the file it came from.
    pub fn load(filename: impl Into<PathBuf>, source: LoadFault) -> Self {
        PhaseError::Load {
            filename: filename.into(),
            source,
        }
    }

    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, PhaseError::Eos(EosError::ConvergenceFailed { .. }))
    }
}
