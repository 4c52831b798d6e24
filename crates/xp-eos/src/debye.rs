//! Debye model of lattice thermal energy.

use std::f64::consts::PI;
use xp_core::constants::GAS_CONSTANT;

/// `B_n / ((n + 3) n!)` for the even Bernoulli numbers `B_2 .. B_12`, paired with `n + 3`.
const SERIES: [(i32, f64); 6] = [
    (5, (1.0 / 6.0) / (5.0 * 2.0)),
    (7, (-1.0 / 30.0) / (7.0 * 24.0)),
    (9, (1.0 / 42.0) / (9.0 * 720.0)),
    (11, (-1.0 / 30.0) / (11.0 * 40_320.0)),
    (13, (5.0 / 66.0) / (13.0 * 3_628_800.0)),
    (15, (-691.0 / 2730.0) / (15.0 * 479_001_600.0)),
];

/// `∫₀^∞ x³/(eˣ-1) dx`
const FULL_INTEGRAL: f64 = PI * PI * PI * PI / 15.0;

/// `∫₀^y x³/(eˣ-1) dx`
pub fn debye_integral(y: f64) -> f64 {
    if y <= 0.0 {
        return 0.0;
    }
    if y < 1.0 {
        // x/(eˣ-1) = Σ Bₙ xⁿ/n!, integrated term by term.
        let mut sum = y.powi(3) / 3.0 - y.powi(4) / 8.0;
        for (power, coefficient) in SERIES {
            sum += coefficient * y.powi(power);
        }
        return sum;
    }

    let mut tail = 0.0;
    for k in 1..=200 {
        let kf = f64::from(k);
        let term = (-kf * y).exp()
            * (y.powi(3) / kf + 3.0 * y.powi(2) / kf.powi(2) + 6.0 * y / kf.powi(3)
                + 6.0 / kf.powi(4));
        tail += term;
        if term < 1e-17 * FULL_INTEGRAL {
            break;
        }
    }
    FULL_INTEGRAL - tail
}

/// Thermal energy [J/mol] of `n` atoms per formula unit at temperature `t` [K]
/// for Debye temperature `debye_t` [K].
pub fn thermal_energy(t: f64, debye_t: f64, n: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    let y = debye_t / t;
    9.0 * n * GAS_CONSTANT * t * debye_integral(y) / y.powi(3)
}
