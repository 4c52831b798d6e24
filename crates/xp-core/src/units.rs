// xp-core/src/units.rs

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn gpa(v: f64) -> Pressure {
    use uom::si::pressure::gigapascal;
    Pressure::new::<gigapascal>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn in_pa(p: Pressure) -> f64 {
    use uom::si::pressure::pascal;
    p.get::<pascal>()
}

#[inline]
pub fn in_gpa(p: Pressure) -> f64 {
    use uom::si::pressure::gigapascal;
    p.get::<gigapascal>()
}

#[inline]
pub fn in_kelvin(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::kelvin;
    t.get::<kelvin>()
}

pub mod constants {
    use super::*;

    /// Molar gas constant [J/(mol·K)].
    pub const GAS_CONSTANT: f64 = 8.314_462_618;

    /// Planck constant times speed of light [keV·Å], as used for energy-dispersive lines.
    pub const HC_KEV_ANGSTROM: f64 = 12.398;

    /// Reference temperature of tabulated EOS parameters [K].
    pub const REFERENCE_TEMPERATURE_K: f64 = 300.0;

    #[inline]
    pub fn reference_temperature() -> Temperature {
        k(REFERENCE_TEMPERATURE_K)
    }

    #[inline]
    pub fn ambient_pressure() -> Pressure {
        pa(0.0)
    }
}
