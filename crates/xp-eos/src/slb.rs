//! Stixrude & Lithgow-Bertelloni finite-strain model with a Debye thermal pressure.
//!
//! All quantities are SI: volumes in m³/mol, moduli and pressures in Pa, energies in J/mol.

use crate::catalog::keys;
use crate::debye::thermal_energy;
use crate::error::{EosError, EosResult};
use crate::params::EosParameterSet;
use xp_core::constants::REFERENCE_TEMPERATURE_K;
use xp_core::ensure_positive;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlbModel {
    pub v0: f64,
    pub k0: f64,
    pub k0_prime: f64,
    pub g0: f64,
    pub g0_prime: f64,
    pub n: f64,
    pub debye_0: f64,
    pub grueneisen_0: f64,
    pub q_0: f64,
    pub eta_s_0: f64,
}

/// Quantities of the quasi-harmonic Debye model at one volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibrationalState {
    /// Eulerian finite strain
    pub strain: f64,
    /// (ν/ν₀)²
    pub frequency_ratio_sq: f64,
    pub debye_temperature: f64,
    pub grueneisen: f64,
}

impl SlbModel {
    pub fn from_params(params: &EosParameterSet) -> EosResult<Self> {
        let model = Self {
            v0: params.get(keys::V_0)?,
            k0: params.get(keys::K_0)?,
            k0_prime: params.get(keys::KPRIME_0)?,
            g0: params.get(keys::G_0)?,
            g0_prime: params.get(keys::GPRIME_0)?,
            n: params.get(keys::N)?,
            debye_0: params.get(keys::DEBYE_0)?,
            grueneisen_0: params.get(keys::GRUENEISEN_0)?,
            q_0: params.get(keys::Q_0)?,
            eta_s_0: params.get(keys::ETA_S_0)?,
        };
        if !(model.v0 > 0.0 && model.k0 > 0.0) {
            return Err(EosError::NonPhysical {
                what: "V0 and K0 must be positive",
            });
        }
        if !(model.n > 0.0 && model.debye_0 > 0.0) {
            return Err(EosError::NonPhysical {
                what: "atom count and Debye temperature must be positive",
            });
        }
        Ok(model)
    }

    fn a1(&self) -> f64 {
        6.0 * self.grueneisen_0
    }

    fn a2(&self) -> f64 {
        let g = self.grueneisen_0;
        -12.0 * g + 36.0 * g * g - 18.0 * self.q_0 * g
    }

    pub fn vibrational_state(&self, v: f64) -> EosResult<VibrationalState> {
        ensure_positive(v, "volume")?;
        let f = 0.5 * ((self.v0 / v).powf(2.0 / 3.0) - 1.0);
        let (a1, a2) = (self.a1(), self.a2());
        let nu_sq = 1.0 + a1 * f + 0.5 * a2 * f * f;
        if !(nu_sq > 0.0) {
            return Err(EosError::NonPhysical {
                what: "vibrational frequency squared must be positive",
            });
        }
        Ok(VibrationalState {
            strain: f,
            frequency_ratio_sq: nu_sq,
            debye_temperature: self.debye_0 * nu_sq.sqrt(),
            grueneisen: (2.0 * f + 1.0) * (a1 + a2 * f) / (6.0 * nu_sq),
        })
    }

    /// Thermal energy at `t` minus thermal energy at the reference temperature.
    fn excess_thermal_energy(&self, state: &VibrationalState, t: f64) -> f64 {
        thermal_energy(t, state.debye_temperature, self.n)
            - thermal_energy(REFERENCE_TEMPERATURE_K, state.debye_temperature, self.n)
    }

    /// Pressure [Pa] at volume `v` and temperature `t`.
    pub fn pressure(&self, v: f64, t: f64) -> EosResult<f64> {
        let state = self.vibrational_state(v)?;
        let f = state.strain;
        let b_iikk = 9.0 * self.k0;
        let b_iikkmm = 27.0 * self.k0 * (self.k0_prime - 4.0);
        let cold = (1.0 + 2.0 * f).powf(2.5) * (b_iikk * f + 0.5 * b_iikkmm * f * f) / 3.0;
        let thermal = state.grueneisen * self.excess_thermal_energy(&state, t) / v;
        Ok(cold + thermal)
    }

    /// Shear modulus [Pa] at volume `v` and temperature `t`.
    pub fn shear_modulus(&self, v: f64, t: f64) -> EosResult<f64> {
        let state = self.vibrational_state(v)?;
        let f = state.strain;
        let a2_s = -2.0 * self.grueneisen_0 - 2.0 * self.eta_s_0;
        let eta_s = -state.grueneisen
            - 0.5 * (2.0 * f + 1.0).powi(2) * a2_s / state.frequency_ratio_sq;

        let x = self.v0 / v;
        let cold = self.g0
            * x.powf(5.0 / 3.0)
            * (1.0
                - 0.5
                    * (x.powf(2.0 / 3.0) - 1.0)
                    * (5.0 - 3.0 * self.g0_prime * self.k0 / self.g0));
        Ok(cold - eta_s * self.excess_thermal_energy(&state, t) / v)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::EosKind;

    /// Periclase-like parameters.
    pub(crate) fn periclase() -> EosParameterSet {
        EosParameterSet::new(
            EosKind::Slb2,
            [
                (keys::V_0, 11.24e-6),
                (keys::K_0, 161.0e9),
                (keys::KPRIME_0, 3.8),
                (keys::G_0, 131.0e9),
                (keys::GPRIME_0, 2.1),
                (keys::MOLAR_MASS, 0.0403),
                (keys::N, 2.0),
                (keys::DEBYE_0, 767.0),
                (keys::GRUENEISEN_0, 1.36),
                (keys::Q_0, 1.7),
                (keys::ETA_S_0, 2.8),
            ],
        )
        .unwrap()
    }

    #[test]
    fn reference_state_is_unstressed() {
        let model = SlbModel::from_params(&periclase()).unwrap();
        let p = model.pressure(model.v0, REFERENCE_TEMPERATURE_K).unwrap();
        assert_eq!(p, 0.0);
        let state = model.vibrational_state(model.v0).unwrap();
        assert_eq!(state.debye_temperature, 767.0);
        assert!((state.grueneisen - 1.36).abs() < 1e-12);
    }

    #[test]
    fn heating_at_fixed_volume_raises_pressure() {
        let model = SlbModel::from_params(&periclase()).unwrap();
        let hot = model.pressure(model.v0, 2000.0).unwrap();
        assert!(hot > 1.0e9, "thermal pressure {hot}");
    }

    #[test]
    fn reference_shear_modulus_is_g0() {
        let model = SlbModel::from_params(&periclase()).unwrap();
        let g = model.shear_modulus(model.v0, REFERENCE_TEMPERATURE_K).unwrap();
        assert!((g - 131.0e9).abs() < 1.0);
    }
}
