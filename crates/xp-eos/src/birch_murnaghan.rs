//! Third-order Birch-Murnaghan isotherm and the JCPDS4 temperature terms.

use crate::catalog::keys;
use crate::error::{EosError, EosResult};
use crate::params::EosParameterSet;
use xp_core::constants::REFERENCE_TEMPERATURE_K;

/// Isotherm constants at one temperature, in the variant's native units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotherm {
    pub v0: f64,
    pub k0: f64,
    pub k0_prime: f64,
}

impl Isotherm {
    /// Pressure at volume `v`.
    pub fn pressure(&self, v: f64) -> f64 {
        pressure(v / self.v0, self.k0, self.k0_prime)
    }
}

/// BM3 pressure at volume ratio `x = V/V0`, in the unit of `k0`.
pub fn pressure(x: f64, k0: f64, k0_prime: f64) -> f64 {
    let compression = x.powf(-2.0 / 3.0);
    1.5 * k0
        * (x.powf(-7.0 / 3.0) - x.powf(-5.0 / 3.0))
        * (1.0 + 0.75 * (k0_prime - 4.0) * (compression - 1.0))
}

/// Reference isotherm of a `bm3` parameter set; temperature plays no role.
pub fn bm3_isotherm(params: &EosParameterSet) -> EosResult<Isotherm> {
    let isotherm = Isotherm {
        v0: params.get(keys::V_0)?,
        k0: params.get(keys::K_0)?,
        k0_prime: params.get(keys::KPRIME_0)?,
    };
    validate(isotherm)
}

/// Isotherm of a `jcpds4` parameter set at temperature `t` [K].
///
/// `K0` and `K0'` vary linearly with `T - 300 K`; `V0` follows the integrated expansion
/// coefficient `α(T) = α₀ + dα/dT · (T - 300 K)`.
pub fn jcpds4_isotherm(params: &EosParameterSet, t: f64) -> EosResult<Isotherm> {
    let dt = t - REFERENCE_TEMPERATURE_K;
    let alpha_t0 = params.get(keys::ALPHA_T0)?;
    let d_alpha_dt = params.get(keys::D_ALPHA_DT)?;
    let expansion = alpha_t0 * dt + 0.5 * d_alpha_dt * dt * dt;

    let isotherm = Isotherm {
        v0: params.get(keys::V_0)? * expansion.exp(),
        k0: params.get(keys::K_0)? + params.get(keys::DK0_DT)? * dt,
        k0_prime: params.get(keys::KPRIME_0)? + params.get(keys::DK0P_DT)? * dt,
    };
    validate(isotherm)
}

fn validate(isotherm: Isotherm) -> EosResult<Isotherm> {
    if !(isotherm.v0.is_finite() && isotherm.v0 > 0.0) {
        return Err(EosError::NonPhysical {
            what: "V0 must be positive and finite",
        });
    }
    if !(isotherm.k0.is_finite() && isotherm.k0 > 0.0) {
        return Err(EosError::NonPhysical {
            what: "K0 must be positive and finite at this temperature",
        });
    }
    if !isotherm.k0_prime.is_finite() {
        return Err(EosError::NonPhysical {
            what: "K0' must be finite",
        });
    }
    Ok(isotherm)
}
