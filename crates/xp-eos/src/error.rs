//! Equation-of-state errors.

use thiserror::Error;
use xp_core::XpError;

/// Result type for equation-of-state operations.
pub type EosResult<T> = Result<T, EosError>;

/// Errors that can occur while describing or evaluating an equation of state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// Identifier not registered in the catalog.
    #[error("Unknown equation of state: {id}")]
    UnknownVariant { id: String },

    /// A required parameter had neither a supplied value nor a default.
    #[error("Missing parameter '{key}' for equation of state {variant}")]
    MissingParameter { variant: &'static str, key: String },

    /// Non-physical intermediate or input (negative volume, imaginary Debye frequency, ...).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Quantity not defined for this variant.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Root finder did not bracket or converge within its budget.
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error(transparent)]
    Core(#[from] XpError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EosError::UnknownVariant { id: "vinet".into() };
        assert!(err.to_string().contains("vinet"));

        let err = EosError::MissingParameter {
            variant: "bm3",
            key: "K_0".into(),
        };
        assert!(err.to_string().contains("K_0"));
        assert!(err.to_string().contains("bm3"));
    }

    #[test]
    fn core_error_is_transparent() {
        let err: EosError = XpError::NonFinite {
            what: "K_0",
            value: f64::NAN,
        }
        .into();
        assert!(err.to_string().starts_with("Non-finite"));
    }
}
