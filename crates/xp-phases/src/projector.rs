//! Display-ready reflection positions and intensities for the visible pattern window.

use crate::entry::PhaseEntry;
use crate::error::{PhaseError, PhaseResult};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use xp_core::constants::HC_KEV_ANGSTROM;

/// Baseline the rescaled lines stand on.
pub const LINE_BASELINE: f64 = 1.0;

/// Smallest scale factor handed out; guards against inverted or collapsed lines.
pub const MIN_SCALE_FACTOR: f64 = 0.01;

/// Axis a reflection position is expressed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionUnit {
    /// d-spacing [Å].
    DSpacing,
    /// Photon energy at a fixed detector angle [keV].
    Energy,
    /// Momentum transfer [1/Å].
    Q,
}

impl PositionUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            PositionUnit::DSpacing => "d",
            PositionUnit::Energy => "E",
            PositionUnit::Q => "Q",
        }
    }
}

impl fmt::Display for PositionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for PositionUnit {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "d" => Ok(PositionUnit::DSpacing),
            "E" => Ok(PositionUnit::Energy),
            "Q" | "q" => Ok(PositionUnit::Q),
            other => Err(PhaseError::UnsupportedUnit {
                unit: other.to_string(),
                fallback: Vec::new(),
            }),
        }
    }
}

/// Intensities for every reflection of a phase, already scaled and offset by `baseline`.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaledIntensities {
    pub intensities: Vec<f64>,
    pub scale_factor: f64,
    pub baseline: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedReflections {
    pub positions: Vec<f64>,
    pub intensities: Vec<f64>,
    pub baseline: f64,
}

/// Energy-dispersive projection at a fixed scattering angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionProjector {
    pub two_theta_deg: f64,
}

impl Default for ReflectionProjector {
    fn default() -> Self {
        Self { two_theta_deg: 15.0 }
    }
}

impl ReflectionProjector {
    pub fn new(two_theta_deg: f64) -> Self {
        Self { two_theta_deg }
    }

    fn sin_theta(&self) -> f64 {
        (self.two_theta_deg.to_radians() / 2.0).sin()
    }

    /// `E = hc / (2 d sin θ)` [keV].
    pub fn energy(&self, d: f64) -> f64 {
        HC_KEV_ANGSTROM / (2.0 * d * self.sin_theta())
    }

    /// `Q = 4π sin θ / λ(E)` with `λ = hc / E` [1/Å].
    pub fn momentum_transfer(&self, energy: f64) -> f64 {
        4.0 * PI * self.sin_theta() * energy / HC_KEV_ANGSTROM
    }

    /// Current positions of every reflection of `entry`, in reflection order.
    pub fn positions(&self, entry: &PhaseEntry, unit: PositionUnit) -> Vec<f64> {
        entry
            .reflections()
            .iter()
            .map(|r| match unit {
                PositionUnit::DSpacing => r.d(),
                PositionUnit::Energy => self.energy(r.d()),
                PositionUnit::Q => self.momentum_transfer(self.energy(r.d())),
            })
            .collect()
    }

    /// Project by unit name (`d`, `E`, `Q`/`q`).
    ///
    /// An unknown name is reported as [`PhaseError::UnsupportedUnit`] whose `fallback` holds
    /// one zero per reflection, the positions older callers drew in that case. Whether that
    /// fallback is intended is unresolved; callers should not rely on it for new code.
    pub fn project(&self, entry: &PhaseEntry, unit: &str) -> PhaseResult<Vec<f64>> {
        match unit.parse::<PositionUnit>() {
            Ok(unit) => Ok(self.positions(entry, unit)),
            Err(_) => {
                let fallback = vec![0.0; entry.reflections().len()];
                tracing::warn!(unit, phase = entry.name(), "unsupported position unit, zero positions");
                Err(PhaseError::UnsupportedUnit {
                    unit: unit.to_string(),
                    fallback,
                })
            }
        }
    }

    /// Scale intensities so the strongest line inside `x_range` reaches `y_range.1`.
    ///
    /// Selection is strict on both ends. With nothing in range the factor is 1; a
    /// non-positive factor is clamped to [`MIN_SCALE_FACTOR`]. All lines are returned,
    /// not only the selected ones.
    pub fn rescale_intensities(
        &self,
        entry: &PhaseEntry,
        positions: &[f64],
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> RescaledIntensities {
        let baseline = LINE_BASELINE;
        let reflections = entry.reflections();

        let max_in_range = reflections
            .iter()
            .zip(positions)
            .filter(|(_, x)| **x > x_range.0 && **x < x_range.1)
            .map(|(r, _)| r.intensity)
            .fold(None, |acc: Option<f64>, i| Some(acc.map_or(i, |a| a.max(i))));

        let scale_factor = match max_in_range {
            Some(max) => {
                let raw = (y_range.1 - baseline) / max;
                if raw > 0.0 && raw.is_finite() {
                    raw
                } else {
                    MIN_SCALE_FACTOR
                }
            }
            None => 1.0,
        };

        RescaledIntensities {
            intensities: reflections
                .iter()
                .map(|r| scale_factor * r.intensity + baseline)
                .collect(),
            scale_factor,
            baseline,
        }
    }

    /// Positions and rescaled intensities in one call.
    pub fn rescaled_reflections(
        &self,
        entry: &PhaseEntry,
        unit: PositionUnit,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> ProjectedReflections {
        let positions = self.positions(entry, unit);
        let rescaled = self.rescale_intensities(entry, &positions, x_range, y_range);
        ProjectedReflections {
            positions,
            intensities: rescaled.intensities,
            baseline: rescaled.baseline,
        }
    }
}
