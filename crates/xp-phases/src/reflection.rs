//! Diffraction lines of a phase.

/// One predicted diffraction line.
///
/// `d0` and `intensity` are the source of truth; `d` is derived by the owning phase from its
/// current volume ratio and cannot be set directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    pub h: i32,
    pub k: i32,
    pub l: i32,
    /// Zero-pressure d-spacing [Å]
    pub d0: f64,
    pub intensity: f64,
    d: f64,
}

impl Reflection {
    pub fn new(h: i32, k: i32, l: i32, d0: f64, intensity: f64) -> Self {
        Self {
            h,
            k,
            l,
            d0,
            intensity,
            d: d0,
        }
    }

    /// Placeholder line with zero indices, d-spacing and intensity.
    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0.0, 0.0)
    }

    /// d-spacing at the owning phase's current conditions [Å].
    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn hkl(&self) -> (i32, i32, i32) {
        (self.h, self.k, self.l)
    }

    /// Whether the Miller indices identify a lattice plane.
    pub fn is_indexed(&self) -> bool {
        self.hkl() != (0, 0, 0)
    }

    pub(crate) fn rescale(&mut self, scale_factor: f64) {
        self.d = self.d0 * scale_factor;
    }
}

impl Default for Reflection {
    fn default() -> Self {
        Self::empty()
    }
}

/// Snapshot row of a phase's line table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRow {
    pub d: f64,
    pub intensity: f64,
    pub h: i32,
    pub k: i32,
    pub l: i32,
}

impl From<&Reflection> for LineRow {
    fn from(r: &Reflection) -> Self {
        Self {
            d: r.d(),
            intensity: r.intensity,
            h: r.h,
            k: r.k,
            l: r.l,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reflection_starts_unscaled() {
        let r = Reflection::new(1, 1, 1, 2.5, 50.0);
        assert_eq!(r.d(), 2.5);
        assert!(r.is_indexed());
        assert!(!Reflection::empty().is_indexed());
    }

    #[test]
    fn rescale_is_relative_to_d0() {
        let mut r = Reflection::new(2, 0, 0, 2.0, 10.0);
        r.rescale(0.9);
        r.rescale(0.95);
        assert!((r.d() - 1.9).abs() < 1e-15);
        assert_eq!(LineRow::from(&r).h, 2);
    }
}
