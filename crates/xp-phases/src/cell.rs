//! Unit-cell geometry.

use crate::error::{PhaseError, PhaseResult};
use nalgebra::{Matrix3, Vector3};

/// Cell parameter keys accepted by `PhaseEntry::set_parameter`.
pub mod keys {
    pub const A0: &str = "a0";
    pub const B0: &str = "b0";
    pub const C0: &str = "c0";
    pub const ALPHA0: &str = "alpha0";
    pub const BETA0: &str = "beta0";
    pub const GAMMA0: &str = "gamma0";

    pub const ALL: [&str; 6] = [A0, B0, C0, ALPHA0, BETA0, GAMMA0];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    Cubic,
    Tetragonal,
    Hexagonal,
    Trigonal,
    Rhombohedral,
    Orthorhombic,
    Monoclinic,
    Triclinic,
}

impl Symmetry {
    pub fn parse(name: &str) -> Option<Self> {
        let symmetry = match name.trim().to_ascii_lowercase().as_str() {
            "cubic" => Symmetry::Cubic,
            "tetragonal" => Symmetry::Tetragonal,
            "hexagonal" => Symmetry::Hexagonal,
            "trigonal" => Symmetry::Trigonal,
            "rhombohedral" => Symmetry::Rhombohedral,
            "orthorhombic" => Symmetry::Orthorhombic,
            "monoclinic" => Symmetry::Monoclinic,
            "triclinic" => Symmetry::Triclinic,
            _ => return None,
        };
        Some(symmetry)
    }

    pub fn name(self) -> &'static str {
        match self {
            Symmetry::Cubic => "cubic",
            Symmetry::Tetragonal => "tetragonal",
            Symmetry::Hexagonal => "hexagonal",
            Symmetry::Trigonal => "trigonal",
            Symmetry::Rhombohedral => "rhombohedral",
            Symmetry::Orthorhombic => "orthorhombic",
            Symmetry::Monoclinic => "monoclinic",
            Symmetry::Triclinic => "triclinic",
        }
    }
}

/// Lattice constants [Å] and angles [degrees].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    pub symmetry: Symmetry,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl UnitCell {
    /// Build a cell, applying the symmetry's constraints and validating the metric.
    pub fn new(
        symmetry: Symmetry,
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> PhaseResult<Self> {
        let cell = Self {
            symmetry,
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
        .constrained();
        cell.volume()?;
        Ok(cell)
    }

    pub fn cubic(a: f64) -> PhaseResult<Self> {
        Self::new(Symmetry::Cubic, a, a, a, 90.0, 90.0, 90.0)
    }

    /// Copy with lengths and angles tied together as the symmetry requires.
    pub fn constrained(mut self) -> Self {
        match self.symmetry {
            Symmetry::Cubic => {
                self.b = self.a;
                self.c = self.a;
                self.set_angles(90.0, 90.0, 90.0);
            }
            Symmetry::Tetragonal => {
                self.b = self.a;
                self.set_angles(90.0, 90.0, 90.0);
            }
            Symmetry::Orthorhombic => self.set_angles(90.0, 90.0, 90.0),
            Symmetry::Hexagonal | Symmetry::Trigonal => {
                self.b = self.a;
                self.set_angles(90.0, 90.0, 120.0);
            }
            Symmetry::Rhombohedral => {
                self.b = self.a;
                self.c = self.a;
                self.beta = self.alpha;
                self.gamma = self.alpha;
            }
            Symmetry::Monoclinic => {
                self.alpha = 90.0;
                self.gamma = 90.0;
            }
            Symmetry::Triclinic => {}
        }
        self
    }

    fn set_angles(&mut self, alpha: f64, beta: f64, gamma: f64) {
        self.alpha = alpha;
        self.beta = beta;
        self.gamma = gamma;
    }

    /// Value of a cell key, `None` for keys that are not cell parameters.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            keys::A0 => Some(self.a),
            keys::B0 => Some(self.b),
            keys::C0 => Some(self.c),
            keys::ALPHA0 => Some(self.alpha),
            keys::BETA0 => Some(self.beta),
            keys::GAMMA0 => Some(self.gamma),
            _ => None,
        }
    }

    /// Copy with one cell key changed and constraints re-applied.
    /// `Ok(None)` when `key` is not a cell parameter.
    pub fn with(&self, key: &str, value: f64) -> PhaseResult<Option<Self>> {
        let mut cell = *self;
        match key {
            keys::A0 => cell.a = value,
            keys::B0 => cell.b = value,
            keys::C0 => cell.c = value,
            keys::ALPHA0 => cell.alpha = value,
            keys::BETA0 => cell.beta = value,
            keys::GAMMA0 => cell.gamma = value,
            _ => return Ok(None),
        }
        Self::new(
            cell.symmetry,
            cell.a,
            cell.b,
            cell.c,
            cell.alpha,
            cell.beta,
            cell.gamma,
        )
        .map(Some)
    }

    fn metric(&self) -> Matrix3<f64> {
        let (ca, cb, cg) = (
            self.alpha.to_radians().cos(),
            self.beta.to_radians().cos(),
            self.gamma.to_radians().cos(),
        );
        let (a, b, c) = (self.a, self.b, self.c);
        Matrix3::new(
            a * a,
            a * b * cg,
            a * c * cb,
            a * b * cg,
            b * b,
            b * c * ca,
            a * c * cb,
            b * c * ca,
            c * c,
        )
    }

    /// Cell volume [Å³].
    pub fn volume(&self) -> PhaseResult<f64> {
        if !(self.a > 0.0 && self.b > 0.0 && self.c > 0.0) {
            return Err(PhaseError::InvalidCell {
                what: "lattice constants must be positive",
            });
        }
        let det = self.metric().determinant();
        if !(det.is_finite() && det > 0.0) {
            return Err(PhaseError::InvalidCell {
                what: "cell angles do not describe a lattice",
            });
        }
        Ok(det.sqrt())
    }

    /// Interplanar spacing of `(h k l)` [Å].
    pub fn d_spacing(&self, h: i32, k: i32, l: i32) -> PhaseResult<f64> {
        if (h, k, l) == (0, 0, 0) {
            return Err(PhaseError::InvalidCell {
                what: "d-spacing of (0 0 0) is undefined",
            });
        }
        let reciprocal = self.metric().try_inverse().ok_or(PhaseError::InvalidCell {
            what: "metric tensor is singular",
        })?;
        let hkl = Vector3::new(f64::from(h), f64::from(k), f64::from(l));
        let inv_d_sq = hkl.dot(&(reciprocal * hkl));
        if !(inv_d_sq > 0.0) {
            return Err(PhaseError::InvalidCell {
                what: "reciprocal metric is not positive definite",
            });
        }
        Ok(inv_d_sq.sqrt().recip())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_spacings() {
        let cell = UnitCell::cubic(4.0).unwrap();
        assert!((cell.volume().unwrap() - 64.0).abs() < 1e-9);
        assert!((cell.d_spacing(1, 0, 0).unwrap() - 4.0).abs() < 1e-12);
        assert!((cell.d_spacing(1, 1, 1).unwrap() - 4.0 / 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn hexagonal_spacing() {
        // 1/d² = 4/3 (h² + hk + k²)/a² + l²/c²
        let cell = UnitCell::new(Symmetry::Hexagonal, 3.0, 0.0, 5.0, 0.0, 0.0, 0.0).unwrap();
        let expected = (4.0 / 3.0 * 3.0 / 9.0 + 1.0 / 25.0_f64).sqrt().recip();
        assert!((cell.d_spacing(1, 1, 1).unwrap() - expected).abs() < 1e-12);
        assert_eq!(cell.b, 3.0);
        assert_eq!(cell.gamma, 120.0);
    }

    #[test]
    fn setting_a_keeps_cubic_constraints() {
        let cell = UnitCell::cubic(4.0).unwrap();
        let bigger = cell.with(keys::A0, 5.0).unwrap().unwrap();
        assert_eq!((bigger.a, bigger.b, bigger.c), (5.0, 5.0, 5.0));
        assert!(cell.with("K_0", 1.0).unwrap().is_none());
    }

    #[test]
    fn degenerate_cells_are_rejected() {
        assert!(UnitCell::cubic(0.0).is_err());
        assert!(
            UnitCell::new(Symmetry::Triclinic, 3.0, 3.0, 3.0, 150.0, 150.0, 150.0).is_err()
        );
        assert!(UnitCell::cubic(4.0).unwrap().d_spacing(0, 0, 0).is_err());
    }

    #[test]
    fn symmetry_names_round_trip() {
        for s in [
            Symmetry::Cubic,
            Symmetry::Tetragonal,
            Symmetry::Hexagonal,
            Symmetry::Trigonal,
            Symmetry::Rhombohedral,
            Symmetry::Orthorhombic,
            Symmetry::Monoclinic,
            Symmetry::Triclinic,
        ] {
            assert_eq!(Symmetry::parse(s.name()), Some(s));
        }
    }
}
