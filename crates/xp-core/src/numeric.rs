use crate::{XpError, XpResult};

/// Floating point type used throughout the workspace
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> XpResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(XpError::NonFinite { what, value: v })
    }
}

/// Like [`ensure_finite`], but also rejects zero and negative values.
pub fn ensure_positive(v: Real, what: &'static str) -> XpResult<Real> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(XpError::InvalidArg { what })
    }
}

/// Check that `index` addresses an element of a sequence of length `len`.
pub fn check_index(index: usize, len: usize, what: &'static str) -> XpResult<usize> {
    if index < len {
        Ok(index)
    } else {
        Err(XpError::IndexOob { what, index, len })
    }
}
