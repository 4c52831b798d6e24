//! Bracketed Newton solver for `P_eos(V) = P`.

use crate::error::{EosError, EosResult};
use xp_core::ensure_positive;

/// Root-finder configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Maximum Newton/bisection iterations once a bracket is found
    pub max_iterations: usize,
    /// Relative volume change at which iteration stops
    pub rel_tol: f64,
    /// Factor the trial volume is scaled by while searching for a bracket
    pub bracket_growth: f64,
    /// Maximum bracket-search steps in either direction
    pub max_bracket_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            rel_tol: 1e-12,
            bracket_growth: 1.05,
            max_bracket_steps: 200,
        }
    }
}

/// Solve `residual(v) = 0` for a residual that decreases with volume
/// (`residual(v) = P_eos(v) - P_target`), starting from `v_start`.
///
/// The search walks away from `v_start` until the residual changes sign. It refuses to
/// step past a turning point of the equation of state, so only the branch connected to
/// `v_start` is ever returned.
pub fn solve_volume<F>(residual: F, v_start: f64, config: &SolverConfig) -> EosResult<f64>
where
    F: Fn(f64) -> EosResult<f64>,
{
    ensure_positive(v_start, "starting volume")?;

    let f_start = residual(v_start)?;
    if f_start == 0.0 {
        return Ok(v_start);
    }

    let (lo, hi) = bracket(&residual, v_start, f_start, config)?;
    refine(&residual, lo, hi, config)
}

/// Returns `(lo, hi)` with `residual(lo) >= 0 >= residual(hi)`.
fn bracket<F>(residual: &F, v_start: f64, f_start: f64, config: &SolverConfig) -> EosResult<(f64, f64)>
where
    F: Fn(f64) -> EosResult<f64>,
{
    let growth = config.bracket_growth;
    let mut near = v_start;
    let mut f_near = f_start;

    for _ in 0..config.max_bracket_steps {
        // Positive residual: the EOS pressure is above target, expand.
        let far = if f_start > 0.0 { near * growth } else { near / growth };
        let f_far = residual(far)?;

        if f_start > 0.0 && f_far <= 0.0 {
            return Ok((near, far));
        }
        if f_start < 0.0 && f_far >= 0.0 {
            return Ok((far, near));
        }
        if (f_far - f_near).abs() > 0.0 && (f_far - f_start).abs() < (f_near - f_start).abs() {
            return Err(EosError::ConvergenceFailed {
                what: format!(
                    "pressure passes a turning point of the equation of state near V={far:.6e}"
                ),
            });
        }
        near = far;
        f_near = f_far;
    }

    Err(EosError::ConvergenceFailed {
        what: format!(
            "no volume bracket found within {} steps from V={v_start:.6e}",
            config.max_bracket_steps
        ),
    })
}

fn refine<F>(residual: &F, mut lo: f64, mut hi: f64, config: &SolverConfig) -> EosResult<f64>
where
    F: Fn(f64) -> EosResult<f64>,
{
    let mut v = 0.5 * (lo + hi);

    for iter in 0..config.max_iterations {
        let f = residual(v)?;
        if f == 0.0 {
            return Ok(v);
        }
        if f > 0.0 {
            lo = v;
        } else {
            hi = v;
        }

        let h = v * 1e-7;
        let slope = (residual(v + h)? - residual(v - h)?) / (2.0 * h);
        let mut next = if slope.is_finite() && slope < 0.0 {
            v - f / slope
        } else {
            0.5 * (lo + hi)
        };
        // Keep Newton inside the bracket; fall back to bisection otherwise.
        if !(next > lo && next < hi) {
            next = 0.5 * (lo + hi);
        }

        if (next - v).abs() <= config.rel_tol * v || (hi - lo) <= config.rel_tol * v {
            tracing::trace!(iterations = iter + 1, volume = next, "volume converged");
            return Ok(next);
        }
        v = next;
    }

    Err(EosError::ConvergenceFailed {
        what: format!(
            "maximum iterations {} reached, bracket = [{lo:.6e}, {hi:.6e}]",
            config.max_iterations
        ),
    })
}
