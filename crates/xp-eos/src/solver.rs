//! Volume and lattice scaling from an equation of state.

use crate::birch_murnaghan::{bm3_isotherm, jcpds4_isotherm};
use crate::catalog::{EosKind, PressureUnit};
use crate::error::{EosError, EosResult};
use crate::params::EosParameterSet;
use crate::root::{SolverConfig, solve_volume};
use crate::slb::SlbModel;
use xp_core::constants::REFERENCE_TEMPERATURE_K;
use xp_core::ensure_positive;
use xp_core::units::{Pressure, Temperature, in_gpa, in_kelvin, in_pa, pa};

/// Volumes of one phase at one `(P, T)`, in the variant's native volume unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosState {
    /// Reference volume at P = 0, T = 300 K
    pub v0: f64,
    /// Zero-pressure volume at the requested temperature
    pub v0_t: f64,
    /// Volume at the requested pressure and temperature
    pub v: f64,
}

impl EosState {
    /// Linear lattice scaling relative to the reference volume.
    pub fn scale_factor(&self) -> f64 {
        d_spacing_scale_factor(self.v, self.v0)
    }
}

/// `(V / V0)^(1/3)`: isotropic linear scaling of every d-spacing.
pub fn d_spacing_scale_factor(v: f64, v0: f64) -> f64 {
    (v / v0).cbrt()
}

/// Evaluates catalog equations of state.
#[derive(Debug, Clone, Default)]
pub struct EosSolver {
    config: SolverConfig,
}

impl EosSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Reference volume `V0` (P = 0, T = 300 K).
    pub fn reference_volume(&self, params: &EosParameterSet) -> EosResult<f64> {
        match params.kind() {
            EosKind::Jcpds4 => Ok(jcpds4_isotherm(params, REFERENCE_TEMPERATURE_K)?.v0),
            EosKind::Bm3 => Ok(bm3_isotherm(params)?.v0),
            EosKind::Slb2 => Ok(SlbModel::from_params(params)?.v0),
        }
    }

    /// Zero-pressure volume at temperature `t`.
    pub fn zero_pressure_volume(&self, params: &EosParameterSet, t: Temperature) -> EosResult<f64> {
        self.volume_at_conditions(params, pa(0.0), t)
    }

    /// Volume at pressure `p` and temperature `t`.
    pub fn volume_at_conditions(
        &self,
        params: &EosParameterSet,
        p: Pressure,
        t: Temperature,
    ) -> EosResult<f64> {
        Ok(self.evaluate(params, p, t)?.v)
    }

    /// Reference, zero-pressure and compressed volume in one pass.
    pub fn evaluate(
        &self,
        params: &EosParameterSet,
        p: Pressure,
        t: Temperature,
    ) -> EosResult<EosState> {
        let t_k = checked_temperature(params, t)?;
        let p_native = native_pressure(params, p)?;

        let state = match params.kind() {
            EosKind::Jcpds4 | EosKind::Bm3 => {
                let isotherm = if params.kind() == EosKind::Jcpds4 {
                    jcpds4_isotherm(params, t_k)?
                } else {
                    bm3_isotherm(params)?
                };
                let v = if p_native == 0.0 {
                    isotherm.v0
                } else {
                    solve_volume(
                        |v| Ok(isotherm.pressure(v) - p_native),
                        isotherm.v0,
                        &self.config,
                    )?
                };
                EosState {
                    v0: self.reference_volume(params)?,
                    v0_t: isotherm.v0,
                    v,
                }
            }
            EosKind::Slb2 => {
                let model = SlbModel::from_params(params)?;
                let v0_t = solve_volume(|v| model.pressure(v, t_k), model.v0, &self.config)?;
                let v = if p_native == 0.0 {
                    v0_t
                } else {
                    solve_volume(|v| Ok(model.pressure(v, t_k)? - p_native), v0_t, &self.config)?
                };
                EosState {
                    v0: model.v0,
                    v0_t,
                    v,
                }
            }
        };

        tracing::debug!(
            eos = params.kind().id(),
            pressure = p_native,
            temperature = t_k,
            v0 = state.v0,
            v = state.v,
            "evaluated equation of state"
        );
        Ok(state)
    }

    /// Shear modulus at `(p, t)`; only variants with a shear law support it.
    pub fn shear_modulus(
        &self,
        params: &EosParameterSet,
        p: Pressure,
        t: Temperature,
    ) -> EosResult<Pressure> {
        match params.kind() {
            EosKind::Slb2 => {
                let model = SlbModel::from_params(params)?;
                let state = self.evaluate(params, p, t)?;
                Ok(pa(model.shear_modulus(state.v, in_kelvin(t))?))
            }
            EosKind::Jcpds4 | EosKind::Bm3 => Err(EosError::NotSupported {
                what: "shear modulus requires an equation of state with a shear law",
            }),
        }
    }
}

/// Temperature in kelvin for variants with a thermal law; `bm3` never reads it.
fn checked_temperature(params: &EosParameterSet, t: Temperature) -> EosResult<f64> {
    let t_k = in_kelvin(t);
    match params.kind() {
        EosKind::Jcpds4 | EosKind::Slb2 => Ok(ensure_positive(t_k, "temperature")?),
        EosKind::Bm3 => Ok(t_k),
    }
}

/// Pressure expressed in the unit the variant's moduli are tabulated in.
fn native_pressure(params: &EosParameterSet, p: Pressure) -> EosResult<f64> {
    let value = match params.variant().pressure_unit {
        PressureUnit::GigaPascal => in_gpa(p),
        PressureUnit::Pascal => in_pa(p),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EosError::NonPhysical {
            what: "pressure must be finite",
        })
    }
}
